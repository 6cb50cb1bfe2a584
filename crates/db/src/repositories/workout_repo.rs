//! Repository for the `workouts` and `workout_exercises` tables.

use std::collections::HashMap;

use gymplan_core::types::DbId;
use sqlx::PgPool;

use crate::models::workout::{
    CreateWorkout, NewWorkoutExercise, UpdateWorkout, Workout, WorkoutDetail,
    WorkoutExerciseDetail, WorkoutExerciseRow,
};
use crate::repositories::ExerciseRepo;

/// Column list for the `workouts` table.
const COLUMNS: &str = "id, name, description";

/// Column list for the `workout_exercises` table.
const ENTRY_COLUMNS: &str = "id, workout_id, exercise_id, target_sets, target_reps";

/// Provides CRUD operations for workouts and their exercise entries.
pub struct WorkoutRepo;

impl WorkoutRepo {
    /// Insert a new workout and all of its entries in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateWorkout) -> Result<Workout, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO workouts (name, description) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let workout = sqlx::query_as::<_, Workout>(&insert_query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_entries_inner(&mut tx, workout.id, &input.workout_exercises).await?;

        tx.commit().await?;
        Ok(workout)
    }

    /// Find a workout by ID with every entry and exercise expanded.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<WorkoutDetail>, sqlx::Error> {
        let mut tx = crate::begin_snapshot(pool).await?;
        let query = format!("SELECT {COLUMNS} FROM workouts WHERE id = $1");
        let workout = sqlx::query_as::<_, Workout>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let detail = match workout {
            Some(workout) => Self::attach_entries(&mut tx, vec![workout]).await?.pop(),
            None => None,
        };
        tx.commit().await?;
        Ok(detail)
    }

    /// List every workout in expanded form, ordered by name.
    pub async fn list_details(pool: &PgPool) -> Result<Vec<WorkoutDetail>, sqlx::Error> {
        let mut tx = crate::begin_snapshot(pool).await?;
        let query = format!("SELECT {COLUMNS} FROM workouts ORDER BY name, id");
        let workouts = sqlx::query_as::<_, Workout>(&query)
            .fetch_all(&mut *tx)
            .await?;
        let details = Self::attach_entries(&mut tx, workouts).await?;
        tx.commit().await?;
        Ok(details)
    }

    /// Load the expanded form of each workout in `ids`, keyed by id, within
    /// the caller's transaction.
    pub(crate) async fn details_by_ids_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        ids: &[DbId],
    ) -> Result<HashMap<DbId, WorkoutDetail>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let query = format!("SELECT {COLUMNS} FROM workouts WHERE id = ANY($1)");
        let workouts = sqlx::query_as::<_, Workout>(&query)
            .bind(ids)
            .fetch_all(&mut **tx)
            .await?;
        let details = Self::attach_entries(tx, workouts).await?;
        Ok(details.into_iter().map(|d| (d.workout.id, d)).collect())
    }

    /// Update a workout's scalar fields and, if supplied, replace its
    /// entries, all in one transaction.
    ///
    /// Returns `None` (and writes nothing) if no row with the given `id`
    /// exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkout,
    ) -> Result<Option<Workout>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE workouts SET \
                name = COALESCE($2, name), \
                description = CASE WHEN $3 THEN $4 ELSE description END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let workout = sqlx::query_as::<_, Workout>(&update_query)
            .bind(id)
            .bind(&input.name)
            .bind(input.description.is_some())
            .bind(input.description.clone().flatten())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(workout) = workout else {
            return Ok(None);
        };

        if let Some(ref entries) = input.workout_exercises {
            sqlx::query("DELETE FROM workout_exercises WHERE workout_id = $1")
                .bind(workout.id)
                .execute(&mut *tx)
                .await?;
            Self::insert_entries_inner(&mut tx, workout.id, entries).await?;
        }

        tx.commit().await?;
        Ok(Some(workout))
    }

    /// Delete a workout. Its entries go with it (FK cascade) and any plan
    /// day that scheduled it is left unassigned (FK set null).
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1")
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
        sqlx::query_scalar::<_, DbId>("SELECT id FROM workouts WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Expand each workout with its entries (in insertion order) and each
    /// entry's exercise. Two batched queries regardless of batch size.
    async fn attach_entries(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        workouts: Vec<Workout>,
    ) -> Result<Vec<WorkoutDetail>, sqlx::Error> {
        let ids: Vec<DbId> = workouts.iter().map(|w| w.id).collect();
        let rows = if ids.is_empty() {
            Vec::new()
        } else {
            let query = format!(
                "SELECT {ENTRY_COLUMNS} FROM workout_exercises \
                 WHERE workout_id = ANY($1) ORDER BY id"
            );
            sqlx::query_as::<_, WorkoutExerciseRow>(&query)
                .bind(&ids)
                .fetch_all(&mut **tx)
                .await?
        };

        let mut exercise_ids: Vec<DbId> = rows.iter().map(|r| r.exercise_id).collect();
        exercise_ids.sort_unstable();
        exercise_ids.dedup();
        let exercises = ExerciseRepo::details_by_ids_inner(tx, &exercise_ids).await?;

        let mut by_workout: HashMap<DbId, Vec<WorkoutExerciseDetail>> = HashMap::new();
        for row in rows {
            // Entries cascade with their exercise, so on one snapshot the
            // lookup always hits.
            let Some(exercise) = exercises.get(&row.exercise_id).cloned() else {
                continue;
            };
            by_workout
                .entry(row.workout_id)
                .or_default()
                .push(WorkoutExerciseDetail {
                    id: row.id,
                    exercise,
                    target_sets: row.target_sets,
                    target_reps: row.target_reps,
                });
        }

        Ok(workouts
            .into_iter()
            .map(|workout| {
                let workout_exercises = by_workout.remove(&workout.id).unwrap_or_default();
                WorkoutDetail {
                    workout,
                    workout_exercises,
                }
            })
            .collect())
    }

    /// Insert entry rows within an existing transaction.
    async fn insert_entries_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        workout_id: DbId,
        entries: &[NewWorkoutExercise],
    ) -> Result<(), sqlx::Error> {
        for entry in entries {
            sqlx::query(
                "INSERT INTO workout_exercises \
                    (workout_id, exercise_id, target_sets, target_reps) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(workout_id)
            .bind(entry.exercise_id)
            .bind(entry.target_sets)
            .bind(&entry.target_reps)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}
