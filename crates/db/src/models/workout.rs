//! Workout aggregate: the workout row plus its ordered exercise entries.

use gymplan_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

use super::exercise::ExerciseDetail;

/// A row from the `workouts` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Workout {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
}

/// A row from the `workout_exercises` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct WorkoutExerciseRow {
    pub id: DbId,
    pub workout_id: DbId,
    pub exercise_id: DbId,
    pub target_sets: i32,
    pub target_reps: String,
}

/// Read shape of one workout entry, with the full exercise inlined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkoutExerciseDetail {
    pub id: DbId,
    pub exercise: ExerciseDetail,
    pub target_sets: i32,
    pub target_reps: String,
}

/// A workout with its entries expanded, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkoutDetail {
    #[serde(flatten)]
    pub workout: Workout,
    pub workout_exercises: Vec<WorkoutExerciseDetail>,
}

/// A child entry to insert; has no id until persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkoutExercise {
    pub exercise_id: DbId,
    pub target_sets: i32,
    pub target_reps: String,
}

/// DTO for creating a workout together with its entries.
#[derive(Debug, Clone)]
pub struct CreateWorkout {
    pub name: String,
    pub description: Option<String>,
    pub workout_exercises: Vec<NewWorkoutExercise>,
}

/// DTO for updating a workout. Same replace semantics as
/// [`UpdateExercise`](super::exercise::UpdateExercise).
#[derive(Debug, Clone, Default)]
pub struct UpdateWorkout {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub workout_exercises: Option<Vec<NewWorkoutExercise>>,
}
