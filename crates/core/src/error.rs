use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Validation failure attributed to one or more named input fields.
    #[error("Validation failed: {0}")]
    InvalidFields(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Per-field validation messages, keyed by the field's path in the request
/// body (e.g. `name`, `workout_exercises[2].target_sets`, `day3_workout`).
///
/// Serializes as a plain `{ "field": ["message", ...] }` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Move every message from `other` into `self`, prefixing each field with
    /// `prefix` (used for items of nested lists).
    pub fn merge_prefixed(&mut self, prefix: &str, other: FieldErrors) {
        for (field, messages) in other.0 {
            let key = format!("{prefix}.{field}");
            self.0.entry(key).or_default().extend(messages);
        }
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when no messages were collected, otherwise
    /// [`CoreError::InvalidFields`].
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidFields(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, list) in errors.field_errors() {
            for err in list.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({}).", err.code));
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::InvalidFields(errors.into())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn empty_field_errors_are_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn collected_field_errors_become_invalid_fields() {
        let mut errors = FieldErrors::new();
        errors.add("name", "This field is required.");
        assert_matches!(errors.into_result(), Err(CoreError::InvalidFields(f)) if f.contains("name"));
    }

    #[test]
    fn merge_prefixed_namespaces_nested_fields() {
        let mut item = FieldErrors::new();
        item.add("target_sets", "Ensure this value is greater than or equal to 1.");

        let mut parent = FieldErrors::new();
        parent.merge_prefixed("workout_exercises[1]", item);

        assert!(parent.contains("workout_exercises[1].target_sets"));
    }

    #[test]
    fn display_joins_every_message() {
        let mut errors = FieldErrors::new();
        errors.add("a", "first");
        errors.add("b", "second");
        assert_eq!(errors.to_string(), "a: first; b: second");
    }

    #[test]
    fn serializes_as_flat_object() {
        let mut errors = FieldErrors::new();
        errors.add("password", "This password is too common.");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["password"][0], "This password is too common.");
    }
}
