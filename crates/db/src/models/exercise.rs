//! Exercise aggregate: the exercise row plus its muscle activations.
//!
//! Activations are written through the exercise only (the whole list is
//! replaced on every write that supplies it) and are rendered with their
//! muscle group inlined.

use gymplan_core::activation::ActivationLevel;
use gymplan_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

use super::muscle_group::MuscleGroup;

/// A row from the `exercises` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Exercise {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
}

/// An `exercise_muscle_activations` row joined with its muscle group.
#[derive(Debug, Clone, FromRow)]
pub struct ActivationRow {
    pub id: DbId,
    pub exercise_id: DbId,
    pub activation_level: String,
    pub muscle_group_id: DbId,
    pub muscle_group_name: String,
}

/// Read shape of one activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MuscleActivationDetail {
    pub id: DbId,
    pub muscle_group: MuscleGroup,
    pub activation_level: ActivationLevel,
    pub activation_level_display: &'static str,
}

impl MuscleActivationDetail {
    pub fn new(id: DbId, muscle_group: MuscleGroup, level: ActivationLevel) -> Self {
        Self {
            id,
            muscle_group,
            activation_level: level,
            activation_level_display: level.label(),
        }
    }
}

impl TryFrom<ActivationRow> for MuscleActivationDetail {
    type Error = sqlx::Error;

    fn try_from(row: ActivationRow) -> Result<Self, Self::Error> {
        let level = ActivationLevel::from_code(&row.activation_level).ok_or_else(|| {
            sqlx::Error::Decode(
                format!("unknown activation level code {:?}", row.activation_level).into(),
            )
        })?;
        Ok(Self::new(
            row.id,
            MuscleGroup {
                id: row.muscle_group_id,
                name: row.muscle_group_name,
            },
            level,
        ))
    }
}

/// An exercise with its activations expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseDetail {
    #[serde(flatten)]
    pub exercise: Exercise,
    pub muscle_activations: Vec<MuscleActivationDetail>,
}

/// A child activation to insert; has no id until persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewMuscleActivation {
    pub muscle_group_id: DbId,
    pub activation_level: ActivationLevel,
}

/// DTO for creating an exercise together with its activations.
#[derive(Debug, Clone)]
pub struct CreateExercise {
    pub name: String,
    pub description: Option<String>,
    pub muscle_activations: Vec<NewMuscleActivation>,
}

/// DTO for updating an exercise.
///
/// `description: Some(None)` clears it. `muscle_activations: Some(list)`
/// replaces every existing activation with `list` (which may be empty);
/// `None` leaves them untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateExercise {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub muscle_activations: Option<Vec<NewMuscleActivation>>,
}
