//! Integration tests for owner-scoped plans.
//!
//! - All seven slots round-trip
//! - Another owner's plan is invisible and immutable
//! - Deleting a scheduled workout clears the slot, the plan survives
//! - Deleting the owner removes their plans
//! - At most one active plan per owner

use gymplan_core::schedule::{DaySlot, WeekSchedule};
use gymplan_db::models::plan::{CreatePlan, UpdatePlan};
use gymplan_db::models::user::CreateUser;
use gymplan_db::models::workout::CreateWorkout;
use gymplan_db::repositories::{PlanRepo, UserRepo, WorkoutRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn workout(pool: &PgPool, name: &str) -> i64 {
    WorkoutRepo::create(
        pool,
        &CreateWorkout {
            name: name.to_string(),
            description: None,
            workout_exercises: vec![],
        },
    )
    .await
    .unwrap()
    .id
}

fn new_plan(owner_id: i64, name: &str, schedule: WeekSchedule) -> CreatePlan {
    CreatePlan {
        owner_id,
        name: name.to_string(),
        description: None,
        is_active: false,
        schedule,
    }
}

fn slot(workout_id: Option<i64>, is_rest: bool) -> DaySlot {
    DaySlot { workout_id, is_rest }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_seven_slots_round_trip(pool: PgPool) {
    let owner = user(&pool, "alice").await;
    let push = workout(&pool, "Push").await;
    let pull = workout(&pool, "Pull").await;

    let schedule = WeekSchedule {
        days: [
            slot(Some(push), false),
            slot(Some(pull), false),
            slot(None, true),
            slot(Some(push), false),
            slot(None, false),
            slot(Some(pull), false),
            slot(None, true),
        ],
    };
    let plan = PlanRepo::create(&pool, &new_plan(owner, "PPL", schedule))
        .await
        .unwrap();
    assert_eq!(plan.owner_username, "alice");

    let detail = PlanRepo::find_detail_owned(&pool, plan.id, owner)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.schedule(), schedule);
    assert_eq!(detail.days[1].workout.as_ref().unwrap().workout.name, "Pull");
    assert!(detail.days[2].workout.is_none());
    assert!(detail.days[4].workout.is_none());

    let stored = PlanRepo::schedule_owned(&pool, plan.id, owner)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, schedule);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_other_owner_cannot_see_or_touch_plan(pool: PgPool) {
    let alice = user(&pool, "alice").await;
    let bob = user(&pool, "bob").await;
    let plan = PlanRepo::create(&pool, &new_plan(alice, "Mine", WeekSchedule::default()))
        .await
        .unwrap();

    assert!(PlanRepo::find_detail_owned(&pool, plan.id, bob).await.unwrap().is_none());
    assert!(PlanRepo::schedule_owned(&pool, plan.id, bob).await.unwrap().is_none());
    assert!(PlanRepo::list_details_for_owner(&pool, bob).await.unwrap().is_empty());

    let update = UpdatePlan {
        name: Some("Stolen".to_string()),
        ..Default::default()
    };
    assert!(PlanRepo::update_owned(&pool, plan.id, bob, &update)
        .await
        .unwrap()
        .is_none());
    assert!(!PlanRepo::delete_owned(&pool, plan.id, bob).await.unwrap());

    let still = PlanRepo::find_owned(&pool, plan.id, alice).await.unwrap().unwrap();
    assert_eq!(still.name, "Mine");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_workout_clears_slot(pool: PgPool) {
    let owner = user(&pool, "alice").await;
    let legs = workout(&pool, "Legs").await;
    let mut schedule = WeekSchedule::default();
    schedule.days[2] = slot(Some(legs), false);
    let plan = PlanRepo::create(&pool, &new_plan(owner, "Week", schedule))
        .await
        .unwrap();

    assert!(WorkoutRepo::delete(&pool, legs).await.unwrap());

    let detail = PlanRepo::find_detail_owned(&pool, plan.id, owner)
        .await
        .unwrap()
        .expect("plan survives workout deletion");
    assert_eq!(detail.days[2].slot, DaySlot::default());
    assert!(detail.days[2].workout.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_owner_removes_plans(pool: PgPool) {
    let owner = user(&pool, "alice").await;
    let plan = PlanRepo::create(&pool, &new_plan(owner, "Week", WeekSchedule::default()))
        .await
        .unwrap();

    assert!(UserRepo::delete(&pool, owner).await.unwrap());

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM plan_days WHERE plan_id = $1")
        .bind(plan.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
    assert!(PlanRepo::find_owned(&pool, plan.id, owner).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_single_active_plan_per_owner(pool: PgPool) {
    let alice = user(&pool, "alice").await;
    let bob = user(&pool, "bob").await;

    let mut first = new_plan(alice, "First", WeekSchedule::default());
    first.is_active = true;
    let first = PlanRepo::create(&pool, &first).await.unwrap();

    let mut bobs = new_plan(bob, "Bob's", WeekSchedule::default());
    bobs.is_active = true;
    let bobs = PlanRepo::create(&pool, &bobs).await.unwrap();

    let mut second = new_plan(alice, "Second", WeekSchedule::default());
    second.is_active = true;
    let second = PlanRepo::create(&pool, &second).await.unwrap();

    let first_now = PlanRepo::find_owned(&pool, first.id, alice).await.unwrap().unwrap();
    assert!(!first_now.is_active);
    assert!(second.is_active);

    let reactivated = PlanRepo::activate_owned(&pool, first.id, alice)
        .await
        .unwrap()
        .unwrap();
    assert!(reactivated.is_active);
    let second_now = PlanRepo::find_owned(&pool, second.id, alice).await.unwrap().unwrap();
    assert!(!second_now.is_active);

    // Other owners are unaffected.
    let bobs_now = PlanRepo::find_owned(&pool, bobs.id, bob).await.unwrap().unwrap();
    assert!(bobs_now.is_active);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_schedule_only_when_supplied(pool: PgPool) {
    let owner = user(&pool, "alice").await;
    let push = workout(&pool, "Push").await;
    let mut schedule = WeekSchedule::default();
    schedule.days[0] = slot(Some(push), false);
    let plan = PlanRepo::create(&pool, &new_plan(owner, "Week", schedule))
        .await
        .unwrap();

    let rename = UpdatePlan {
        name: Some("Renamed".to_string()),
        description: Some(Some("Notes".to_string())),
        ..Default::default()
    };
    let renamed = PlanRepo::update_owned(&pool, plan.id, owner, &rename)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.name, "Renamed");
    assert_eq!(renamed.description.as_deref(), Some("Notes"));
    let stored = PlanRepo::schedule_owned(&pool, plan.id, owner).await.unwrap().unwrap();
    assert_eq!(stored, schedule);

    let mut rest_week = WeekSchedule::default();
    rest_week.days[6] = slot(None, true);
    let reschedule = UpdatePlan {
        schedule: Some(rest_week),
        ..Default::default()
    };
    PlanRepo::update_owned(&pool, plan.id, owner, &reschedule)
        .await
        .unwrap()
        .unwrap();
    let stored = PlanRepo::schedule_owned(&pool, plan.id, owner).await.unwrap().unwrap();
    assert_eq!(stored, rest_week);
}
