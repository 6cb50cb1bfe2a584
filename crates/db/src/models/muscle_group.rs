//! Muscle group entity model and DTOs.

use gymplan_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `muscle_groups` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct MuscleGroup {
    pub id: DbId,
    pub name: String,
}

/// DTO for creating a new muscle group.
#[derive(Debug, Clone)]
pub struct CreateMuscleGroup {
    pub name: String,
}

/// DTO for updating a muscle group.
#[derive(Debug, Clone, Default)]
pub struct UpdateMuscleGroup {
    pub name: Option<String>,
}
