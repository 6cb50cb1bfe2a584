//! Repository for the `muscle_groups` table.

use gymplan_core::types::DbId;
use sqlx::PgPool;

use crate::models::muscle_group::{CreateMuscleGroup, MuscleGroup, UpdateMuscleGroup};

/// Column list for the `muscle_groups` table.
const COLUMNS: &str = "id, name";

/// Provides CRUD operations for muscle groups.
pub struct MuscleGroupRepo;

impl MuscleGroupRepo {
    /// Insert a new muscle group, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMuscleGroup,
    ) -> Result<MuscleGroup, sqlx::Error> {
        let query = format!("INSERT INTO muscle_groups (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, MuscleGroup>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a muscle group by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MuscleGroup>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM muscle_groups WHERE id = $1");
        sqlx::query_as::<_, MuscleGroup>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all muscle groups ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<MuscleGroup>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM muscle_groups ORDER BY name, id");
        sqlx::query_as::<_, MuscleGroup>(&query).fetch_all(pool).await
    }

    /// Update a muscle group. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMuscleGroup,
    ) -> Result<Option<MuscleGroup>, sqlx::Error> {
        let query = format!(
            "UPDATE muscle_groups SET name = COALESCE($2, name) WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MuscleGroup>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a muscle group. Its activation rows go with it (FK cascade).
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM muscle_groups WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Return the subset of `ids` that exist.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar::<_, DbId>("SELECT id FROM muscle_groups WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
