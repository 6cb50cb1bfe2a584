//! Plan payloads.
//!
//! The seven day-slots arrive as flat `dayN_workout` / `dayN_is_rest` keys
//! and are collected into a [`SchedulePatch`]. On update the patch is merged
//! into the stored schedule before the slot rules are checked, so a partial
//! payload is judged against the week it will produce.

use gymplan_core::error::{CoreError, FieldErrors};
use gymplan_core::patch::double_option;
use gymplan_core::schedule::{day_key, DayField, SchedulePatch, WeekSchedule};
use gymplan_core::types::DbId;
use gymplan_db::models::plan::{CreatePlan, UpdatePlan};
use gymplan_db::repositories::WorkoutRepo;
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use super::{field_errors, not_blank, require, WriteMode};
use crate::error::AppResult;

/// Body of `POST`/`PUT`/`PATCH /plans`.
///
/// `owner`, `owner_username` and `dayN_workout_details` are read-only and
/// ignored if present.
#[derive(Debug, Deserialize, Validate)]
pub struct PlanPayload {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Ensure this field has no more than 200 characters.")
    )]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub schedule: SchedulePatch,
}

/// Decode a create payload for a plan owned by `owner_id`.
pub async fn decode_create(
    pool: &PgPool,
    owner_id: DbId,
    payload: PlanPayload,
) -> AppResult<CreatePlan> {
    let mut errors = field_errors(&payload);
    require(&mut errors, WriteMode::Create, "name", &payload.name);

    let mut schedule = WeekSchedule::default();
    schedule.apply(&payload.schedule);
    check_schedule(pool, &mut errors, &payload.schedule, &schedule).await?;
    errors.into_result()?;

    Ok(CreatePlan {
        owner_id,
        name: payload.name.unwrap_or_default(),
        description: payload.description.flatten(),
        is_active: payload.is_active.unwrap_or(false),
        schedule,
    })
}

/// Decode an update payload against the plan's `current` schedule.
///
/// The returned `schedule` is `None` when the payload touches no day-slot.
pub async fn decode_update(
    pool: &PgPool,
    payload: PlanPayload,
    mode: WriteMode,
    current: WeekSchedule,
) -> AppResult<UpdatePlan> {
    let mut errors = field_errors(&payload);
    require(&mut errors, mode, "name", &payload.name);

    let schedule = if payload.schedule.is_empty() {
        None
    } else {
        let mut merged = current;
        merged.apply(&payload.schedule);
        check_schedule(pool, &mut errors, &payload.schedule, &merged).await?;
        Some(merged)
    };
    errors.into_result()?;

    Ok(UpdatePlan {
        name: payload.name,
        description: payload.description,
        is_active: payload.is_active,
        schedule,
    })
}

/// Slot rules on the resulting week, plus existence of every workout the
/// payload assigns.
async fn check_schedule(
    pool: &PgPool,
    errors: &mut FieldErrors,
    patch: &SchedulePatch,
    schedule: &WeekSchedule,
) -> AppResult<()> {
    if let Err(CoreError::InvalidFields(slot_errors)) = schedule.validate() {
        errors.merge(slot_errors);
    }

    let assigned = patch.assigned_workouts();
    let ids: Vec<DbId> = assigned.iter().map(|&(_, id)| id).collect();
    let existing = WorkoutRepo::existing_ids(pool, &ids).await?;
    for (day, id) in assigned {
        if !existing.contains(&id) {
            errors.add(
                day_key(day, DayField::Workout),
                format!("Invalid pk \"{id}\" - object does not exist."),
            );
        }
    }
    Ok(())
}
