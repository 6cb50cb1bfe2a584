//! Handlers for the `/plans` resource.
//!
//! Plans are private to their owner. Every query carries the caller's id,
//! so a plan owned by someone else answers 404 exactly like a missing one.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use gymplan_core::error::CoreError;
use gymplan_core::types::DbId;
use gymplan_db::models::plan::PlanDetail;
use gymplan_db::repositories::PlanRepo;

use crate::codec::plan::{decode_create, decode_update, PlanPayload};
use crate::codec::WriteMode;
use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, PathParam};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Plan", id })
}

async fn load_detail(state: &AppState, id: DbId, owner_id: DbId) -> AppResult<PlanDetail> {
    PlanRepo::find_detail_owned(&state.pool, id, owner_id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// GET /api/v1/plans
///
/// Only the caller's own plans.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<PlanDetail>>> {
    let plans = PlanRepo::list_details_for_owner(&state.pool, auth.user_id).await?;
    tracing::debug!(count = plans.len(), user_id = auth.user_id, "Listed plans");
    Ok(Json(plans))
}

/// POST /api/v1/plans
///
/// The owner is always the caller; any `owner` in the body is ignored.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(payload): JsonBody<PlanPayload>,
) -> AppResult<(StatusCode, Json<PlanDetail>)> {
    let input = decode_create(&state.pool, auth.user_id, payload).await?;
    let created = PlanRepo::create(&state.pool, &input).await?;
    tracing::info!(
        id = created.id,
        is_active = created.is_active,
        user_id = auth.user_id,
        "Plan created",
    );
    let detail = load_detail(&state, created.id, auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/plans/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<DbId>,
) -> AppResult<Json<PlanDetail>> {
    Ok(Json(load_detail(&state, id, auth.user_id).await?))
}

/// PUT /api/v1/plans/{id}
pub async fn replace(
    state: State<AppState>,
    auth: AuthUser,
    id: PathParam<DbId>,
    body: JsonBody<PlanPayload>,
) -> AppResult<Json<PlanDetail>> {
    update(state, auth, id, body, WriteMode::Replace).await
}

/// PATCH /api/v1/plans/{id}
pub async fn patch(
    state: State<AppState>,
    auth: AuthUser,
    id: PathParam<DbId>,
    body: JsonBody<PlanPayload>,
) -> AppResult<Json<PlanDetail>> {
    update(state, auth, id, body, WriteMode::Patch).await
}

async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<DbId>,
    JsonBody(payload): JsonBody<PlanPayload>,
    mode: WriteMode,
) -> AppResult<Json<PlanDetail>> {
    let current = PlanRepo::schedule_owned(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let input = decode_update(&state.pool, payload, mode, current).await?;
    PlanRepo::update_owned(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(
        id,
        rescheduled = input.schedule.is_some(),
        user_id = auth.user_id,
        "Plan updated",
    );
    Ok(Json(load_detail(&state, id, auth.user_id).await?))
}

/// POST /api/v1/plans/{id}/activate
///
/// Make this the caller's only active plan.
pub async fn activate(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<DbId>,
) -> AppResult<Json<PlanDetail>> {
    PlanRepo::activate_owned(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(id, user_id = auth.user_id, "Plan activated");
    Ok(Json(load_detail(&state, id, auth.user_id).await?))
}

/// DELETE /api/v1/plans/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<DbId>,
) -> AppResult<StatusCode> {
    if !PlanRepo::delete_owned(&state.pool, id, auth.user_id).await? {
        return Err(not_found(id));
    }
    tracing::info!(id, user_id = auth.user_id, "Plan deleted");
    Ok(StatusCode::NO_CONTENT)
}
