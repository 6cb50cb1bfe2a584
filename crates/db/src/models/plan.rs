//! Plan aggregate: the plan row plus its seven day-slots.
//!
//! Slots are stored as `plan_days` rows and held in memory as a
//! [`WeekSchedule`]. The response shape flattens them into
//! `dayN_workout` / `dayN_is_rest` / `dayN_workout_details` keys.

use gymplan_core::schedule::{day_key, DayField, DaySlot, WeekSchedule, DAYS_PER_WEEK};
use gymplan_core::types::DbId;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use sqlx::FromRow;

use super::workout::WorkoutDetail;

/// A row from the `plans` table joined with its owner's username.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Plan {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: DbId,
    pub owner_username: String,
    pub is_active: bool,
}

/// A row from the `plan_days` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct PlanDayRow {
    pub plan_id: DbId,
    pub day_number: i16,
    pub workout_id: Option<DbId>,
    pub is_rest: bool,
}

/// One expanded day-slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanDayDetail {
    pub slot: DaySlot,
    /// Present exactly when `slot.workout_id` is set.
    pub workout: Option<WorkoutDetail>,
}

/// A plan with every day-slot expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDetail {
    pub plan: Plan,
    pub days: [PlanDayDetail; DAYS_PER_WEEK],
}

impl PlanDetail {
    /// The raw schedule (ids and rest flags only).
    pub fn schedule(&self) -> WeekSchedule {
        WeekSchedule {
            days: std::array::from_fn(|i| self.days[i].slot),
        }
    }
}

impl Serialize for PlanDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(6 + 3 * DAYS_PER_WEEK))?;
        map.serialize_entry("id", &self.plan.id)?;
        map.serialize_entry("name", &self.plan.name)?;
        map.serialize_entry("description", &self.plan.description)?;
        map.serialize_entry("owner", &self.plan.owner_id)?;
        map.serialize_entry("owner_username", &self.plan.owner_username)?;
        map.serialize_entry("is_active", &self.plan.is_active)?;
        for (day, detail) in (1u8..).zip(self.days.iter()) {
            map.serialize_entry(&day_key(day, DayField::Workout), &detail.slot.workout_id)?;
            map.serialize_entry(&day_key(day, DayField::IsRest), &detail.slot.is_rest)?;
            map.serialize_entry(&day_key(day, DayField::WorkoutDetails), &detail.workout)?;
        }
        map.end()
    }
}

/// DTO for creating a plan. `owner_id` always comes from the authenticated
/// caller.
#[derive(Debug, Clone)]
pub struct CreatePlan {
    pub owner_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub schedule: WeekSchedule,
}

/// DTO for updating a plan. `schedule`, when present, is the complete merged
/// week to store.
#[derive(Debug, Clone, Default)]
pub struct UpdatePlan {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub schedule: Option<WeekSchedule>,
}
