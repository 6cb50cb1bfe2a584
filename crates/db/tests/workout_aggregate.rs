//! Integration tests for the workout aggregate.
//!
//! - Entry replacement leaves exactly the submitted rows
//! - `None` entry list leaves rows untouched
//! - Entries render in insertion order with the exercise expanded
//! - Deleting an exercise removes the entries that used it

use gymplan_db::models::exercise::CreateExercise;
use gymplan_db::models::workout::{CreateWorkout, NewWorkoutExercise, UpdateWorkout};
use gymplan_db::repositories::{ExerciseRepo, WorkoutRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn exercise(pool: &PgPool, name: &str) -> i64 {
    ExerciseRepo::create(
        pool,
        &CreateExercise {
            name: name.to_string(),
            description: None,
            muscle_activations: vec![],
        },
    )
    .await
    .unwrap()
    .id
}

fn entry(exercise_id: i64, sets: i32, reps: &str) -> NewWorkoutExercise {
    NewWorkoutExercise {
        exercise_id,
        target_sets: sets,
        target_reps: reps.to_string(),
    }
}

fn new_workout(name: &str, entries: Vec<NewWorkoutExercise>) -> CreateWorkout {
    CreateWorkout {
        name: name.to_string(),
        description: None,
        workout_exercises: entries,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_entries_render_in_insertion_order(pool: PgPool) {
    let squat = exercise(&pool, "Squat").await;
    let bench = exercise(&pool, "Bench Press").await;
    let deadlift = exercise(&pool, "Deadlift").await;

    let w = WorkoutRepo::create(
        &pool,
        &new_workout(
            "Full Body",
            vec![entry(squat, 5, "5"), entry(bench, 3, "8-12"), entry(deadlift, 1, "5")],
        ),
    )
    .await
    .unwrap();

    let detail = WorkoutRepo::find_detail(&pool, w.id).await.unwrap().unwrap();
    let order: Vec<i64> = detail
        .workout_exercises
        .iter()
        .map(|e| e.exercise.exercise.id)
        .collect();
    assert_eq!(order, vec![squat, bench, deadlift]);
    assert_eq!(detail.workout_exercises[1].exercise.exercise.name, "Bench Press");
    assert_eq!(detail.workout_exercises[1].target_reps, "8-12");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_entries_leaves_only_new_rows(pool: PgPool) {
    let e1 = exercise(&pool, "E1").await;
    let e2 = exercise(&pool, "E2").await;
    let w = WorkoutRepo::create(&pool, &new_workout("Day A", vec![entry(e1, 3, "8-12")]))
        .await
        .unwrap();

    let update = UpdateWorkout {
        workout_exercises: Some(vec![entry(e2, 4, "10")]),
        ..Default::default()
    };
    WorkoutRepo::update(&pool, w.id, &update).await.unwrap().unwrap();

    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM workout_exercises WHERE workout_id = $1")
            .bind(w.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(rows, 1);

    let detail = WorkoutRepo::find_detail(&pool, w.id).await.unwrap().unwrap();
    assert_eq!(detail.workout_exercises[0].exercise.exercise.id, e2);
    assert_eq!(detail.workout_exercises[0].target_sets, 4);
    assert_eq!(detail.workout_exercises[0].target_reps, "10");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_without_entries_keeps_them(pool: PgPool) {
    let e1 = exercise(&pool, "E1").await;
    let w = WorkoutRepo::create(&pool, &new_workout("Day A", vec![entry(e1, 3, "8-12")]))
        .await
        .unwrap();
    let before = WorkoutRepo::find_detail(&pool, w.id).await.unwrap().unwrap();

    let update = UpdateWorkout {
        name: Some("Day B".to_string()),
        ..Default::default()
    };
    let updated = WorkoutRepo::update(&pool, w.id, &update).await.unwrap().unwrap();
    assert_eq!(updated.name, "Day B");

    let after = WorkoutRepo::find_detail(&pool, w.id).await.unwrap().unwrap();
    assert_eq!(after.workout_exercises, before.workout_exercises);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_target_sets_rolls_back(pool: PgPool) {
    let e1 = exercise(&pool, "E1").await;
    let result = WorkoutRepo::create(&pool, &new_workout("Broken", vec![entry(e1, 0, "5")])).await;
    assert!(result.is_err());
    assert!(WorkoutRepo::list_details(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_exercise_removes_its_entries(pool: PgPool) {
    let e1 = exercise(&pool, "E1").await;
    let e2 = exercise(&pool, "E2").await;
    let w = WorkoutRepo::create(
        &pool,
        &new_workout("Day A", vec![entry(e1, 3, "8"), entry(e2, 3, "8")]),
    )
    .await
    .unwrap();

    assert!(ExerciseRepo::delete(&pool, e1).await.unwrap());

    let detail = WorkoutRepo::find_detail(&pool, w.id).await.unwrap().unwrap();
    assert_eq!(detail.workout_exercises.len(), 1);
    assert_eq!(detail.workout_exercises[0].exercise.exercise.id, e2);
}
