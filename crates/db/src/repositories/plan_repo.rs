//! Repository for the `plans` and `plan_days` tables.
//!
//! Every read and write is scoped to an owner: the owner id is part of the
//! `WHERE` clause, so another user's plan is indistinguishable from a
//! missing one.

use std::collections::HashMap;

use gymplan_core::schedule::{DaySlot, WeekSchedule, DAYS_PER_WEEK};
use gymplan_core::types::DbId;
use sqlx::PgPool;

use crate::models::plan::{CreatePlan, Plan, PlanDayDetail, PlanDayRow, PlanDetail, UpdatePlan};
use crate::repositories::WorkoutRepo;

/// Column list for `plans` (aliased `p`) joined with `users` (aliased `u`).
const COLUMNS: &str = "p.id, p.name, p.description, p.owner_id, \
    u.username AS owner_username, p.is_active";

/// Column list for the `plan_days` table.
const DAY_COLUMNS: &str = "plan_id, day_number, workout_id, is_rest";

/// Provides owner-scoped CRUD operations for plans and their day-slots.
pub struct PlanRepo;

impl PlanRepo {
    /// Insert a new plan with all seven day-slots in one transaction.
    ///
    /// If the plan is created active, the owner's other plans are
    /// deactivated first.
    pub async fn create(pool: &PgPool, input: &CreatePlan) -> Result<Plan, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if input.is_active {
            Self::deactivate_others_inner(&mut tx, input.owner_id, None).await?;
        }

        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO plans (name, description, owner_id, is_active) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.owner_id)
        .bind(input.is_active)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_days_inner(&mut tx, id, &input.schedule).await?;

        let plan = Self::fetch_owned_inner(&mut tx, id, input.owner_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        tx.commit().await?;
        Ok(plan)
    }

    /// Find a plan row owned by `owner_id`.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Plan>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM plans p JOIN users u ON u.id = p.owner_id \
             WHERE p.id = $1 AND p.owner_id = $2"
        );
        sqlx::query_as::<_, Plan>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a plan owned by `owner_id`, with every day-slot expanded.
    pub async fn find_detail_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<PlanDetail>, sqlx::Error> {
        let mut tx = crate::begin_snapshot(pool).await?;
        let detail = match Self::fetch_owned_inner(&mut tx, id, owner_id).await? {
            Some(plan) => Self::attach_days(&mut tx, vec![plan]).await?.pop(),
            None => None,
        };
        tx.commit().await?;
        Ok(detail)
    }

    /// List the owner's plans in expanded form, ordered by name.
    pub async fn list_details_for_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<PlanDetail>, sqlx::Error> {
        let mut tx = crate::begin_snapshot(pool).await?;
        let query = format!(
            "SELECT {COLUMNS} FROM plans p JOIN users u ON u.id = p.owner_id \
             WHERE p.owner_id = $1 ORDER BY p.name, p.id"
        );
        let plans = sqlx::query_as::<_, Plan>(&query)
            .bind(owner_id)
            .fetch_all(&mut *tx)
            .await?;
        let details = Self::attach_days(&mut tx, plans).await?;
        tx.commit().await?;
        Ok(details)
    }

    /// The stored schedule of a plan owned by `owner_id` (ids and rest flags
    /// only). Used as the base that a partial update is merged into.
    pub async fn schedule_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<WeekSchedule>, sqlx::Error> {
        let mut tx = crate::begin_snapshot(pool).await?;
        if Self::fetch_owned_inner(&mut tx, id, owner_id).await?.is_none() {
            return Ok(None);
        }
        let query = format!("SELECT {DAY_COLUMNS} FROM plan_days WHERE plan_id = $1");
        let rows = sqlx::query_as::<_, PlanDayRow>(&query)
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        let mut schedule = WeekSchedule::default();
        for row in rows {
            if let Some(slot) = slot_index(row.day_number).and_then(|i| schedule.days.get_mut(i)) {
                *slot = DaySlot {
                    workout_id: row.workout_id,
                    is_rest: row.is_rest,
                };
            }
        }
        Ok(Some(schedule))
    }

    /// Update a plan owned by `owner_id` in one transaction.
    ///
    /// Setting `is_active` to `true` deactivates the owner's other plans.
    /// A supplied `schedule` replaces all seven slots. Returns `None` (and
    /// writes nothing) if the plan does not exist or belongs to someone else.
    pub async fn update_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        input: &UpdatePlan,
    ) -> Result<Option<Plan>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if input.is_active == Some(true) {
            Self::deactivate_others_inner(&mut tx, owner_id, Some(id)).await?;
        }

        let updated = sqlx::query_scalar::<_, DbId>(
            "UPDATE plans SET \
                name = COALESCE($3, name), \
                description = CASE WHEN $4 THEN $5 ELSE description END, \
                is_active = COALESCE($6, is_active) \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING id",
        )
        .bind(id)
        .bind(owner_id)
        .bind(&input.name)
        .bind(input.description.is_some())
        .bind(input.description.clone().flatten())
        .bind(input.is_active)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }

        if let Some(ref schedule) = input.schedule {
            sqlx::query("DELETE FROM plan_days WHERE plan_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::insert_days_inner(&mut tx, id, schedule).await?;
        }

        let plan = Self::fetch_owned_inner(&mut tx, id, owner_id).await?;
        tx.commit().await?;
        Ok(plan)
    }

    /// Make a plan the owner's single active plan.
    pub async fn activate_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Plan>, sqlx::Error> {
        let input = UpdatePlan {
            is_active: Some(true),
            ..Default::default()
        };
        Self::update_owned(pool, id, owner_id, &input).await
    }

    /// Delete a plan owned by `owner_id`. Its day-slots go with it.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete_owned(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM plans WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Expand each plan's day-slots, resolving every scheduled workout once.
    async fn attach_days(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        plans: Vec<Plan>,
    ) -> Result<Vec<PlanDetail>, sqlx::Error> {
        let ids: Vec<DbId> = plans.iter().map(|p| p.id).collect();
        let rows = if ids.is_empty() {
            Vec::new()
        } else {
            let query = format!("SELECT {DAY_COLUMNS} FROM plan_days WHERE plan_id = ANY($1)");
            sqlx::query_as::<_, PlanDayRow>(&query)
                .bind(&ids)
                .fetch_all(&mut **tx)
                .await?
        };

        let mut workout_ids: Vec<DbId> = rows.iter().filter_map(|r| r.workout_id).collect();
        workout_ids.sort_unstable();
        workout_ids.dedup();
        let workouts = WorkoutRepo::details_by_ids_inner(tx, &workout_ids).await?;

        let mut by_plan: HashMap<DbId, Vec<PlanDayRow>> = HashMap::new();
        for row in rows {
            by_plan.entry(row.plan_id).or_default().push(row);
        }

        Ok(plans
            .into_iter()
            .map(|plan| {
                let mut days: [PlanDayDetail; DAYS_PER_WEEK] = Default::default();
                for row in by_plan.remove(&plan.id).unwrap_or_default() {
                    let Some(day) = slot_index(row.day_number).and_then(|i| days.get_mut(i)) else {
                        continue;
                    };
                    let workout = row.workout_id.and_then(|w| workouts.get(&w).cloned());
                    day.slot = DaySlot {
                        workout_id: workout.as_ref().map(|w| w.workout.id),
                        is_rest: row.is_rest,
                    };
                    day.workout = workout;
                }
                PlanDetail { plan, days }
            })
            .collect())
    }

    /// Clear `is_active` on every plan of `owner_id` except `keep`.
    async fn deactivate_others_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        owner_id: DbId,
        keep: Option<DbId>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE plans SET is_active = false \
             WHERE owner_id = $1 AND is_active AND ($2::BIGINT IS NULL OR id <> $2)",
        )
        .bind(owner_id)
        .bind(keep)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Insert all seven `plan_days` rows within an existing transaction.
    async fn insert_days_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        plan_id: DbId,
        schedule: &WeekSchedule,
    ) -> Result<(), sqlx::Error> {
        for (day, slot) in schedule.iter() {
            sqlx::query(
                "INSERT INTO plan_days (plan_id, day_number, workout_id, is_rest) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(plan_id)
            .bind(i16::from(day))
            .bind(slot.workout_id)
            .bind(slot.is_rest)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn fetch_owned_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Plan>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM plans p JOIN users u ON u.id = p.owner_id \
             WHERE p.id = $1 AND p.owner_id = $2"
        );
        sqlx::query_as::<_, Plan>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&mut **tx)
            .await
    }
}

/// Zero-based array index for a stored 1-based day number.
fn slot_index(day_number: i16) -> Option<usize> {
    usize::try_from(day_number).ok()?.checked_sub(1)
}
