//! The fixed seven-day schedule of a training plan.
//!
//! Internally a plan's schedule is an array of [`DaySlot`]s indexed by day
//! (1..=7). On the wire each slot is flattened into `dayN_workout`,
//! `dayN_is_rest` and (read-only) `dayN_workout_details` keys; this module
//! owns that key format in both directions.

use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{CoreError, FieldErrors};
use crate::types::DbId;

/// Number of day-slots in every plan.
pub const DAYS_PER_WEEK: usize = 7;

/// The per-day fields exposed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayField {
    /// `dayN_workout`: workout id or `null` (read/write).
    Workout,
    /// `dayN_is_rest`: rest flag (read/write).
    IsRest,
    /// `dayN_workout_details`: expanded workout (read-only).
    WorkoutDetails,
}

impl DayField {
    fn suffix(self) -> &'static str {
        match self {
            Self::Workout => "workout",
            Self::IsRest => "is_rest",
            Self::WorkoutDetails => "workout_details",
        }
    }
}

/// Build the wire key for `field` on `day` (1-based), e.g. `day3_is_rest`.
pub fn day_key(day: u8, field: DayField) -> String {
    format!("day{day}_{}", field.suffix())
}

/// Parse a wire key such as `day5_workout`. Returns `None` for anything that
/// is not a day-slot key or names a day outside 1..=7.
pub fn parse_day_key(key: &str) -> Option<(u8, DayField)> {
    let rest = key.strip_prefix("day")?;
    let (num, suffix) = rest.split_once('_')?;
    if num.len() != 1 {
        return None;
    }
    let day: u8 = num.parse().ok()?;
    if day == 0 || usize::from(day) > DAYS_PER_WEEK {
        return None;
    }
    let field = match suffix {
        "workout" => DayField::Workout,
        "is_rest" => DayField::IsRest,
        "workout_details" => DayField::WorkoutDetails,
        _ => return None,
    };
    Some((day, field))
}

/// One day of a plan: an optional workout, a rest flag, or neither
/// (unscheduled).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaySlot {
    pub workout_id: Option<DbId>,
    pub is_rest: bool,
}

/// A full week: exactly [`DAYS_PER_WEEK`] slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekSchedule {
    pub days: [DaySlot; DAYS_PER_WEEK],
}

impl WeekSchedule {
    /// Slot for a 1-based day number.
    pub fn slot(&self, day: u8) -> Option<&DaySlot> {
        usize::from(day)
            .checked_sub(1)
            .and_then(|i| self.days.get(i))
    }

    /// Iterate `(day, slot)` pairs with 1-based day numbers.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &DaySlot)> {
        (1u8..).zip(self.days.iter())
    }

    /// Overlay every field present in `patch`.
    pub fn apply(&mut self, patch: &SchedulePatch) {
        for (slot, change) in self.days.iter_mut().zip(patch.days.iter()) {
            if let Some(workout_id) = change.workout_id {
                slot.workout_id = workout_id;
            }
            if let Some(is_rest) = change.is_rest {
                slot.is_rest = is_rest;
            }
        }
    }

    /// A slot may be a workout day or a rest day, not both.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut errors = FieldErrors::new();
        for (day, slot) in self.iter() {
            if slot.is_rest && slot.workout_id.is_some() {
                errors.add(
                    day_key(day, DayField::IsRest),
                    "A rest day cannot also have a workout assigned.",
                );
            }
        }
        errors.into_result()
    }

    /// Distinct workout ids referenced by the schedule, ascending.
    pub fn workout_ids(&self) -> Vec<DbId> {
        let mut ids: Vec<DbId> = self.days.iter().filter_map(|d| d.workout_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Requested change to one slot. `workout_id` distinguishes "not supplied"
/// (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotPatch {
    pub workout_id: Option<Option<DbId>>,
    pub is_rest: Option<bool>,
}

/// The day-slot part of a plan write payload.
///
/// Deserializes from a map, picking out `dayN_workout` / `dayN_is_rest` keys
/// and ignoring everything else (including the read-only
/// `dayN_workout_details`), so it can be `#[serde(flatten)]`ed into the plan
/// payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulePatch {
    pub days: [SlotPatch; DAYS_PER_WEEK],
}

impl SchedulePatch {
    /// `(day, workout_id)` for every slot that assigns a workout.
    pub fn assigned_workouts(&self) -> Vec<(u8, DbId)> {
        (1u8..)
            .zip(self.days.iter())
            .filter_map(|(day, slot)| slot.workout_id.flatten().map(|id| (day, id)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.days
            .iter()
            .all(|slot| slot.workout_id.is_none() && slot.is_rest.is_none())
    }
}

impl<'de> Deserialize<'de> for SchedulePatch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PatchVisitor;

        impl<'de> Visitor<'de> for PatchVisitor {
            type Value = SchedulePatch;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of dayN_workout / dayN_is_rest fields")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut patch = SchedulePatch::default();
                while let Some(key) = map.next_key::<String>()? {
                    match parse_day_key(&key) {
                        Some((day, DayField::Workout)) => {
                            let value = map
                                .next_value::<Option<DbId>>()
                                .map_err(|e| de::Error::custom(format!("{key}: {e}")))?;
                            patch.days[usize::from(day) - 1].workout_id = Some(value);
                        }
                        Some((day, DayField::IsRest)) => {
                            let value = map
                                .next_value::<bool>()
                                .map_err(|e| de::Error::custom(format!("{key}: {e}")))?;
                            patch.days[usize::from(day) - 1].is_rest = Some(value);
                        }
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(patch)
            }
        }

        deserializer.deserialize_map(PatchVisitor)
    }
}
