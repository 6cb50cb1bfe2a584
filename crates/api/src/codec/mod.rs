//! Request payload decoding.
//!
//! Each submodule turns a JSON write payload into the repository DTO for its
//! entity, collecting every problem as a [`FieldErrors`] entry keyed by the
//! field's path in the body. Nested lists are checked item by item, then for
//! unknown and repeated foreign ids, before anything is written.
//!
//! The read side lives with the models in `gymplan_db` (`Serialize` impls).

pub mod exercise;
pub mod muscle_group;
pub mod plan;
pub mod workout;

use std::borrow::Cow;

use gymplan_core::error::FieldErrors;
use validator::{Validate, ValidationError};

/// Message for a missing required field.
pub const REQUIRED: &str = "This field is required.";

/// Which kind of write a payload is decoded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// `POST`: every required field must be present.
    Create,
    /// `PUT`: required fields must be present; absent optional fields are
    /// left unchanged.
    Replace,
    /// `PATCH`: nothing is required; only supplied fields change.
    Patch,
}

impl WriteMode {
    /// Whether required fields must be present.
    pub fn requires_all(self) -> bool {
        !matches!(self, WriteMode::Patch)
    }
}

/// Record [`REQUIRED`] against `field` if the mode requires it and it is absent.
pub(crate) fn require<T>(errors: &mut FieldErrors, mode: WriteMode, field: &str, value: &Option<T>) {
    if mode.requires_all() && value.is_none() {
        errors.add(field, REQUIRED);
    }
}

/// Run the `validator` rules of `payload` into a [`FieldErrors`].
pub(crate) fn field_errors<T: Validate>(payload: &T) -> FieldErrors {
    match payload.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => errors.into(),
    }
}

/// Reject empty or whitespace-only strings.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message(Cow::Borrowed("This field may not be blank.")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_requires_nothing() {
        let mut errors = FieldErrors::new();
        require::<String>(&mut errors, WriteMode::Patch, "name", &None);
        assert!(errors.is_empty());

        require::<String>(&mut errors, WriteMode::Replace, "name", &None);
        assert_eq!(errors.get("name").unwrap(), [REQUIRED.to_string()]);
    }

    #[test]
    fn whitespace_is_blank() {
        assert!(not_blank("  \t").is_err());
        assert!(not_blank(" Squat ").is_ok());
    }
}
