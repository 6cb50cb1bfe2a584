//! Exercise payloads and their nested muscle activations.

use gymplan_core::activation::ActivationLevel;
use gymplan_core::aggregate::{check_distinct_references, check_references_exist};
use gymplan_core::error::FieldErrors;
use gymplan_core::patch::double_option;
use gymplan_core::types::DbId;
use gymplan_db::models::exercise::{CreateExercise, NewMuscleActivation, UpdateExercise};
use gymplan_db::repositories::MuscleGroupRepo;
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use super::{field_errors, not_blank, require, WriteMode, REQUIRED};
use crate::error::AppResult;

const LIST_FIELD: &str = "muscle_activations";
const KEY_FIELD: &str = "muscle_group_id";

/// Body of `POST`/`PUT`/`PATCH /exercises`.
///
/// Read-only fields a client may echo back (`id`, and on each activation
/// `id`, `muscle_group`, `activation_level_display`) are ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct ExercisePayload {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Ensure this field has no more than 200 characters.")
    )]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub muscle_activations: Option<Vec<MuscleActivationPayload>>,
}

/// One element of `muscle_activations` on write.
#[derive(Debug, Deserialize)]
pub struct MuscleActivationPayload {
    pub muscle_group_id: Option<DbId>,
    /// `H`, `M` or `L`; `M` when absent.
    pub activation_level: Option<String>,
}

/// Decode a payload for any write mode, resolving every referenced muscle
/// group against the store.
pub async fn decode(
    pool: &PgPool,
    payload: ExercisePayload,
    mode: WriteMode,
) -> AppResult<UpdateExercise> {
    let mut errors = field_errors(&payload);
    require(&mut errors, mode, "name", &payload.name);
    require(&mut errors, mode, LIST_FIELD, &payload.muscle_activations);

    let activations = match payload.muscle_activations {
        Some(items) => Some(decode_activations(&mut errors, items)),
        None => None,
    };
    errors.into_result()?;

    if let Some(ref activations) = activations {
        let keys: Vec<DbId> = activations.iter().map(|a| a.muscle_group_id).collect();
        let mut errors = FieldErrors::new();
        check_distinct_references(&mut errors, LIST_FIELD, KEY_FIELD, &keys);
        let existing = MuscleGroupRepo::existing_ids(pool, &keys).await?;
        check_references_exist(&mut errors, LIST_FIELD, KEY_FIELD, &keys, &existing);
        errors.into_result()?;
    }

    Ok(UpdateExercise {
        name: payload.name,
        description: payload.description,
        muscle_activations: activations,
    })
}

/// Decode a create payload.
pub async fn decode_create(pool: &PgPool, payload: ExercisePayload) -> AppResult<CreateExercise> {
    let decoded = decode(pool, payload, WriteMode::Create).await?;
    // Presence was checked by `decode`.
    Ok(CreateExercise {
        name: decoded.name.unwrap_or_default(),
        description: decoded.description.flatten(),
        muscle_activations: decoded.muscle_activations.unwrap_or_default(),
    })
}

/// Check each item's own fields. Items with errors are dropped from the
/// result; the caller must not use it unless `errors` stays empty.
fn decode_activations(
    errors: &mut FieldErrors,
    items: Vec<MuscleActivationPayload>,
) -> Vec<NewMuscleActivation> {
    let mut out = Vec::with_capacity(items.len());
    for (pos, item) in items.into_iter().enumerate() {
        let mut item_errors = FieldErrors::new();

        let level = match item.activation_level.as_deref() {
            None => Some(ActivationLevel::default()),
            Some(code) => {
                let level = ActivationLevel::from_code(code);
                if level.is_none() {
                    item_errors.add("activation_level", format!("\"{code}\" is not a valid choice."));
                }
                level
            }
        };
        if item.muscle_group_id.is_none() {
            item_errors.add(KEY_FIELD, REQUIRED);
        }

        match (item.muscle_group_id, level) {
            (Some(muscle_group_id), Some(activation_level)) if item_errors.is_empty() => {
                out.push(NewMuscleActivation {
                    muscle_group_id,
                    activation_level,
                });
            }
            _ => errors.merge_prefixed(&format!("{LIST_FIELD}[{pos}]"), item_errors),
        }
    }
    out
}
