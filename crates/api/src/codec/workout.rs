//! Workout payloads and their nested exercise entries.

use gymplan_core::aggregate::{check_distinct_references, check_references_exist};
use gymplan_core::error::FieldErrors;
use gymplan_core::patch::double_option;
use gymplan_core::types::DbId;
use gymplan_db::models::workout::{CreateWorkout, NewWorkoutExercise, UpdateWorkout};
use gymplan_db::repositories::ExerciseRepo;
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use super::{field_errors, not_blank, require, WriteMode};
use crate::error::AppResult;

const LIST_FIELD: &str = "workout_exercises";
const KEY_FIELD: &str = "exercise_id";

/// Body of `POST`/`PUT`/`PATCH /workouts`.
#[derive(Debug, Deserialize, Validate)]
pub struct WorkoutPayload {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Ensure this field has no more than 200 characters.")
    )]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub workout_exercises: Option<Vec<WorkoutExercisePayload>>,
}

/// One element of `workout_exercises` on write. The expanded `exercise`
/// of the read shape is ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct WorkoutExercisePayload {
    pub exercise_id: Option<DbId>,
    #[validate(range(min = 1, message = "Ensure this value is greater than or equal to 1."))]
    pub target_sets: Option<i32>,
    #[validate(
        custom(function = "not_blank"),
        length(max = 50, message = "Ensure this field has no more than 50 characters.")
    )]
    pub target_reps: Option<String>,
}

/// Decode a payload for any write mode, resolving every referenced exercise
/// against the store.
pub async fn decode(
    pool: &PgPool,
    payload: WorkoutPayload,
    mode: WriteMode,
) -> AppResult<UpdateWorkout> {
    let mut errors = field_errors(&payload);
    require(&mut errors, mode, "name", &payload.name);
    require(&mut errors, mode, LIST_FIELD, &payload.workout_exercises);

    let entries = match payload.workout_exercises {
        Some(items) => Some(decode_entries(&mut errors, items)),
        None => None,
    };
    errors.into_result()?;

    if let Some(ref entries) = entries {
        let keys: Vec<DbId> = entries.iter().map(|e| e.exercise_id).collect();
        let mut errors = FieldErrors::new();
        check_distinct_references(&mut errors, LIST_FIELD, KEY_FIELD, &keys);
        let existing = ExerciseRepo::existing_ids(pool, &keys).await?;
        check_references_exist(&mut errors, LIST_FIELD, KEY_FIELD, &keys, &existing);
        errors.into_result()?;
    }

    Ok(UpdateWorkout {
        name: payload.name,
        description: payload.description,
        workout_exercises: entries,
    })
}

/// Decode a create payload.
pub async fn decode_create(pool: &PgPool, payload: WorkoutPayload) -> AppResult<CreateWorkout> {
    let decoded = decode(pool, payload, WriteMode::Create).await?;
    // Presence was checked by `decode`.
    Ok(CreateWorkout {
        name: decoded.name.unwrap_or_default(),
        description: decoded.description.flatten(),
        workout_exercises: decoded.workout_exercises.unwrap_or_default(),
    })
}

/// Check each entry's own fields. Every field of an entry is required,
/// whatever the write mode, since entries are always written whole.
fn decode_entries(
    errors: &mut FieldErrors,
    items: Vec<WorkoutExercisePayload>,
) -> Vec<NewWorkoutExercise> {
    let mut out = Vec::with_capacity(items.len());
    for (pos, item) in items.into_iter().enumerate() {
        let mut item_errors = field_errors(&item);
        require(&mut item_errors, WriteMode::Create, KEY_FIELD, &item.exercise_id);
        require(&mut item_errors, WriteMode::Create, "target_sets", &item.target_sets);
        require(&mut item_errors, WriteMode::Create, "target_reps", &item.target_reps);

        match (item.exercise_id, item.target_sets, item.target_reps) {
            (Some(exercise_id), Some(target_sets), Some(target_reps)) if item_errors.is_empty() => {
                out.push(NewWorkoutExercise {
                    exercise_id,
                    target_sets,
                    target_reps,
                });
            }
            _ => errors.merge_prefixed(&format!("{LIST_FIELD}[{pos}]"), item_errors),
        }
    }
    out
}
