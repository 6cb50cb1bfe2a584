//! Handlers for the `/exercises` resource.
//!
//! Reads are public; writes require authentication. Every response carries
//! the full aggregate (exercise plus expanded activations).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use gymplan_core::error::CoreError;
use gymplan_core::types::DbId;
use gymplan_db::models::exercise::ExerciseDetail;
use gymplan_db::repositories::ExerciseRepo;

use crate::codec::exercise::{decode, decode_create, ExercisePayload};
use crate::codec::WriteMode;
use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, PathParam};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Exercise",
        id,
    })
}

async fn load_detail(state: &AppState, id: DbId) -> AppResult<ExerciseDetail> {
    ExerciseRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// GET /api/v1/exercises
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ExerciseDetail>>> {
    let exercises = ExerciseRepo::list_details(&state.pool).await?;
    tracing::debug!(count = exercises.len(), "Listed exercises");
    Ok(Json(exercises))
}

/// POST /api/v1/exercises
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(payload): JsonBody<ExercisePayload>,
) -> AppResult<(StatusCode, Json<ExerciseDetail>)> {
    let input = decode_create(&state.pool, payload).await?;
    let created = ExerciseRepo::create(&state.pool, &input).await?;
    tracing::info!(
        id = created.id,
        activations = input.muscle_activations.len(),
        user_id = auth.user_id,
        "Exercise created",
    );
    let detail = load_detail(&state, created.id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/exercises/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    PathParam(id): PathParam<DbId>,
) -> AppResult<Json<ExerciseDetail>> {
    Ok(Json(load_detail(&state, id).await?))
}

/// PUT /api/v1/exercises/{id}
pub async fn replace(
    state: State<AppState>,
    auth: AuthUser,
    id: PathParam<DbId>,
    body: JsonBody<ExercisePayload>,
) -> AppResult<Json<ExerciseDetail>> {
    update(state, auth, id, body, WriteMode::Replace).await
}

/// PATCH /api/v1/exercises/{id}
pub async fn patch(
    state: State<AppState>,
    auth: AuthUser,
    id: PathParam<DbId>,
    body: JsonBody<ExercisePayload>,
) -> AppResult<Json<ExerciseDetail>> {
    update(state, auth, id, body, WriteMode::Patch).await
}

async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<DbId>,
    JsonBody(payload): JsonBody<ExercisePayload>,
    mode: WriteMode,
) -> AppResult<Json<ExerciseDetail>> {
    let input = decode(&state.pool, payload, mode).await?;
    ExerciseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(
        id,
        replaced_activations = input.muscle_activations.is_some(),
        user_id = auth.user_id,
        "Exercise updated",
    );
    Ok(Json(load_detail(&state, id).await?))
}

/// DELETE /api/v1/exercises/{id}
///
/// Workout entries using the exercise are removed with it.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<DbId>,
) -> AppResult<StatusCode> {
    if !ExerciseRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(id, user_id = auth.user_id, "Exercise deleted");
    Ok(StatusCode::NO_CONTENT)
}
