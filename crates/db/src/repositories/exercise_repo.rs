//! Repository for the `exercises` and `exercise_muscle_activations` tables.

use std::collections::HashMap;

use gymplan_core::types::DbId;
use sqlx::PgPool;

use crate::models::exercise::{
    ActivationRow, CreateExercise, Exercise, ExerciseDetail, MuscleActivationDetail,
    NewMuscleActivation, UpdateExercise,
};

/// Column list for the `exercises` table.
const COLUMNS: &str = "id, name, description";

/// Column list for activation rows joined with `muscle_groups` (aliased `mg`).
const ACTIVATION_COLUMNS: &str = "ema.id, ema.exercise_id, ema.activation_level, \
    mg.id AS muscle_group_id, mg.name AS muscle_group_name";

/// Provides CRUD operations for exercises and their muscle activations.
pub struct ExerciseRepo;

impl ExerciseRepo {
    /// Insert a new exercise and all of its activations in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateExercise) -> Result<Exercise, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO exercises (name, description) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let exercise = sqlx::query_as::<_, Exercise>(&insert_query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_activations_inner(&mut tx, exercise.id, &input.muscle_activations).await?;

        tx.commit().await?;
        Ok(exercise)
    }

    /// Find an exercise by ID, enriched with its activations.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ExerciseDetail>, sqlx::Error> {
        let mut tx = crate::begin_snapshot(pool).await?;
        let query = format!("SELECT {COLUMNS} FROM exercises WHERE id = $1");
        let exercise = sqlx::query_as::<_, Exercise>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let detail = match exercise {
            Some(exercise) => Self::attach_activations(&mut tx, vec![exercise]).await?.pop(),
            None => None,
        };
        tx.commit().await?;
        Ok(detail)
    }

    /// List every exercise with its activations, ordered by name.
    pub async fn list_details(pool: &PgPool) -> Result<Vec<ExerciseDetail>, sqlx::Error> {
        let mut tx = crate::begin_snapshot(pool).await?;
        let query = format!("SELECT {COLUMNS} FROM exercises ORDER BY name, id");
        let exercises = sqlx::query_as::<_, Exercise>(&query)
            .fetch_all(&mut *tx)
            .await?;
        let details = Self::attach_activations(&mut tx, exercises).await?;
        tx.commit().await?;
        Ok(details)
    }

    /// Load the expanded form of each exercise in `ids`, keyed by id.
    ///
    /// Ids that do not exist are simply absent from the result.
    pub async fn details_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<HashMap<DbId, ExerciseDetail>, sqlx::Error> {
        let mut tx = crate::begin_snapshot(pool).await?;
        let details = Self::details_by_ids_inner(&mut tx, ids).await?;
        tx.commit().await?;
        Ok(details)
    }

    /// [`Self::details_by_ids`] within a caller's transaction, so an
    /// enclosing aggregate read stays on one snapshot.
    pub(crate) async fn details_by_ids_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        ids: &[DbId],
    ) -> Result<HashMap<DbId, ExerciseDetail>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let query = format!("SELECT {COLUMNS} FROM exercises WHERE id = ANY($1)");
        let exercises = sqlx::query_as::<_, Exercise>(&query)
            .bind(ids)
            .fetch_all(&mut **tx)
            .await?;
        let details = Self::attach_activations(tx, exercises).await?;
        Ok(details.into_iter().map(|d| (d.exercise.id, d)).collect())
    }

    /// Update an exercise's scalar fields and, if supplied, replace its
    /// activations, all in one transaction.
    ///
    /// Returns `None` (and writes nothing) if no row with the given `id`
    /// exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateExercise,
    ) -> Result<Option<Exercise>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE exercises SET \
                name = COALESCE($2, name), \
                description = CASE WHEN $3 THEN $4 ELSE description END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let exercise = sqlx::query_as::<_, Exercise>(&update_query)
            .bind(id)
            .bind(&input.name)
            .bind(input.description.is_some())
            .bind(input.description.clone().flatten())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(exercise) = exercise else {
            return Ok(None);
        };

        if let Some(ref activations) = input.muscle_activations {
            Self::replace_activations_inner(&mut tx, exercise.id, activations).await?;
        }

        tx.commit().await?;
        Ok(Some(exercise))
    }

    /// Delete an exercise. Its activations and any workout entries that use
    /// it go with it (FK cascade).
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM exercises WHERE id = $1")
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
        sqlx::query_scalar::<_, DbId>("SELECT id FROM exercises WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Expand each exercise with its activations using a single query for
    /// the whole batch. Preserves the order of `exercises`.
    async fn attach_activations(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        exercises: Vec<Exercise>,
    ) -> Result<Vec<ExerciseDetail>, sqlx::Error> {
        let ids: Vec<DbId> = exercises.iter().map(|e| e.id).collect();
        let mut by_exercise: HashMap<DbId, Vec<MuscleActivationDetail>> = HashMap::new();

        if !ids.is_empty() {
            let query = format!(
                "SELECT {ACTIVATION_COLUMNS} \
                 FROM exercise_muscle_activations ema \
                 JOIN muscle_groups mg ON mg.id = ema.muscle_group_id \
                 WHERE ema.exercise_id = ANY($1) \
                 ORDER BY ema.id"
            );
            let rows = sqlx::query_as::<_, ActivationRow>(&query)
                .bind(&ids)
                .fetch_all(&mut **tx)
                .await?;
            for row in rows {
                let exercise_id = row.exercise_id;
                by_exercise
                    .entry(exercise_id)
                    .or_default()
                    .push(MuscleActivationDetail::try_from(row)?);
            }
        }

        Ok(exercises
            .into_iter()
            .map(|exercise| {
                let muscle_activations = by_exercise.remove(&exercise.id).unwrap_or_default();
                ExerciseDetail {
                    exercise,
                    muscle_activations,
                }
            })
            .collect())
    }

    /// Delete every activation of the exercise, then insert `activations`.
    async fn replace_activations_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        exercise_id: DbId,
        activations: &[NewMuscleActivation],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM exercise_muscle_activations WHERE exercise_id = $1")
            .bind(exercise_id)
            .execute(&mut **tx)
            .await?;

        Self::insert_activations_inner(tx, exercise_id, activations).await
    }

    /// Insert activation rows within an existing transaction.
    async fn insert_activations_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        exercise_id: DbId,
        activations: &[NewMuscleActivation],
    ) -> Result<(), sqlx::Error> {
        for activation in activations {
            sqlx::query(
                "INSERT INTO exercise_muscle_activations \
                    (exercise_id, muscle_group_id, activation_level) \
                 VALUES ($1, $2, $3)",
            )
            .bind(exercise_id)
            .bind(activation.muscle_group_id)
            .bind(activation.activation_level.code())
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}
