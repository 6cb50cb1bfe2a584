//! Helpers for partial-update payloads.

use serde::{Deserialize, Deserializer};

/// Deserialize a nullable field so that "absent" and "explicit null" can be
/// told apart.
///
/// Use with `#[serde(default, deserialize_with = "double_option")]` on an
/// `Option<Option<T>>` field:
///
/// - field absent      -> `None`
/// - field is `null`   -> `Some(None)`
/// - field has a value -> `Some(Some(v))`
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
