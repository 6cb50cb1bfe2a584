//! Muscle group payloads.

use gymplan_db::models::muscle_group::{CreateMuscleGroup, UpdateMuscleGroup};
use serde::Deserialize;
use validator::Validate;

use super::{field_errors, not_blank, require, WriteMode};
use crate::error::AppResult;

/// Body of `POST`/`PUT`/`PATCH /muscle-groups`.
#[derive(Debug, Deserialize, Validate)]
pub struct MuscleGroupPayload {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub name: Option<String>,
}

/// Decode a payload for any write mode.
pub fn decode(payload: MuscleGroupPayload, mode: WriteMode) -> AppResult<UpdateMuscleGroup> {
    let mut errors = field_errors(&payload);
    require(&mut errors, mode, "name", &payload.name);
    errors.into_result()?;

    Ok(UpdateMuscleGroup { name: payload.name })
}

/// Decode a create payload.
pub fn decode_create(payload: MuscleGroupPayload) -> AppResult<CreateMuscleGroup> {
    let decoded = decode(payload, WriteMode::Create)?;
    // Presence was checked by `decode`.
    Ok(CreateMuscleGroup {
        name: decoded.name.unwrap_or_default(),
    })
}
