//! Handlers for the `/muscle-groups` resource.
//!
//! Reads are public; writes require authentication.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use gymplan_core::error::CoreError;
use gymplan_core::types::DbId;
use gymplan_db::models::muscle_group::MuscleGroup;
use gymplan_db::repositories::MuscleGroupRepo;

use crate::codec::muscle_group::{decode, decode_create, MuscleGroupPayload};
use crate::codec::WriteMode;
use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, PathParam};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "MuscleGroup",
        id,
    })
}

/// GET /api/v1/muscle-groups
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<MuscleGroup>>> {
    let groups = MuscleGroupRepo::list(&state.pool).await?;
    tracing::debug!(count = groups.len(), "Listed muscle groups");
    Ok(Json(groups))
}

/// POST /api/v1/muscle-groups
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(payload): JsonBody<MuscleGroupPayload>,
) -> AppResult<(StatusCode, Json<MuscleGroup>)> {
    let input = decode_create(payload)?;
    let created = MuscleGroupRepo::create(&state.pool, &input).await?;
    tracing::info!(id = created.id, user_id = auth.user_id, "Muscle group created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/muscle-groups/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    PathParam(id): PathParam<DbId>,
) -> AppResult<Json<MuscleGroup>> {
    let group = MuscleGroupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(group))
}

/// PUT /api/v1/muscle-groups/{id}
pub async fn replace(
    state: State<AppState>,
    auth: AuthUser,
    id: PathParam<DbId>,
    body: JsonBody<MuscleGroupPayload>,
) -> AppResult<Json<MuscleGroup>> {
    update(state, auth, id, body, WriteMode::Replace).await
}

/// PATCH /api/v1/muscle-groups/{id}
pub async fn patch(
    state: State<AppState>,
    auth: AuthUser,
    id: PathParam<DbId>,
    body: JsonBody<MuscleGroupPayload>,
) -> AppResult<Json<MuscleGroup>> {
    update(state, auth, id, body, WriteMode::Patch).await
}

async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<DbId>,
    JsonBody(payload): JsonBody<MuscleGroupPayload>,
    mode: WriteMode,
) -> AppResult<Json<MuscleGroup>> {
    let input = decode(payload, mode)?;
    let updated = MuscleGroupRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(id, user_id = auth.user_id, "Muscle group updated");
    Ok(Json(updated))
}

/// DELETE /api/v1/muscle-groups/{id}
///
/// Activations referencing the group are removed with it.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<DbId>,
) -> AppResult<StatusCode> {
    if !MuscleGroupRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(id, user_id = auth.user_id, "Muscle group deleted");
    Ok(StatusCode::NO_CONTENT)
}
