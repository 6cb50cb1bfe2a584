//! Handlers for the `/workouts` resource. Every operation requires
//! authentication.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use gymplan_core::error::CoreError;
use gymplan_core::types::DbId;
use gymplan_db::models::workout::WorkoutDetail;
use gymplan_db::repositories::WorkoutRepo;

use crate::codec::workout::{decode, decode_create, WorkoutPayload};
use crate::codec::WriteMode;
use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, PathParam};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Workout",
        id,
    })
}

async fn load_detail(state: &AppState, id: DbId) -> AppResult<WorkoutDetail> {
    WorkoutRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// GET /api/v1/workouts
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<WorkoutDetail>>> {
    let workouts = WorkoutRepo::list_details(&state.pool).await?;
    tracing::debug!(count = workouts.len(), "Listed workouts");
    Ok(Json(workouts))
}

/// POST /api/v1/workouts
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(payload): JsonBody<WorkoutPayload>,
) -> AppResult<(StatusCode, Json<WorkoutDetail>)> {
    let input = decode_create(&state.pool, payload).await?;
    let created = WorkoutRepo::create(&state.pool, &input).await?;
    tracing::info!(
        id = created.id,
        entries = input.workout_exercises.len(),
        user_id = auth.user_id,
        "Workout created",
    );
    let detail = load_detail(&state, created.id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/workouts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    PathParam(id): PathParam<DbId>,
) -> AppResult<Json<WorkoutDetail>> {
    Ok(Json(load_detail(&state, id).await?))
}

/// PUT /api/v1/workouts/{id}
pub async fn replace(
    state: State<AppState>,
    auth: AuthUser,
    id: PathParam<DbId>,
    body: JsonBody<WorkoutPayload>,
) -> AppResult<Json<WorkoutDetail>> {
    update(state, auth, id, body, WriteMode::Replace).await
}

/// PATCH /api/v1/workouts/{id}
pub async fn patch(
    state: State<AppState>,
    auth: AuthUser,
    id: PathParam<DbId>,
    body: JsonBody<WorkoutPayload>,
) -> AppResult<Json<WorkoutDetail>> {
    update(state, auth, id, body, WriteMode::Patch).await
}

async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<DbId>,
    JsonBody(payload): JsonBody<WorkoutPayload>,
    mode: WriteMode,
) -> AppResult<Json<WorkoutDetail>> {
    let input = decode(&state.pool, payload, mode).await?;
    WorkoutRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(
        id,
        replaced_entries = input.workout_exercises.is_some(),
        user_id = auth.user_id,
        "Workout updated",
    );
    Ok(Json(load_detail(&state, id).await?))
}

/// DELETE /api/v1/workouts/{id}
///
/// Plan days that scheduled the workout become unassigned.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<DbId>,
) -> AppResult<StatusCode> {
    if !WorkoutRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(id, user_id = auth.user_id, "Workout deleted");
    Ok(StatusCode::NO_CONTENT)
}
