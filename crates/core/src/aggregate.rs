//! Rules for nested child collections (exercise activations, workout
//! exercises).
//!
//! A parent may reference each foreign entity at most once. The store
//! enforces this with a unique constraint; these helpers catch it earlier so
//! the client gets a field-level validation error instead of a conflict.

use std::collections::HashSet;
use std::hash::Hash;

use crate::error::FieldErrors;
use crate::types::DbId;

/// Positions (in submission order) of keys that already appeared earlier in
/// the list. The first occurrence of a key is never reported.
pub fn duplicate_positions<K>(keys: impl IntoIterator<Item = K>) -> Vec<usize>
where
    K: Eq + Hash,
{
    let mut seen = HashSet::new();
    keys.into_iter()
        .enumerate()
        .filter_map(|(i, key)| (!seen.insert(key)).then_some(i))
        .collect()
}

/// Record a field error for every repeated foreign id in a nested list.
///
/// `list_field` is the payload field holding the list (e.g.
/// `muscle_activations`), `key_field` the per-item foreign-key field
/// (e.g. `muscle_group_id`).
pub fn check_distinct_references(
    errors: &mut FieldErrors,
    list_field: &str,
    key_field: &str,
    keys: &[DbId],
) {
    for pos in duplicate_positions(keys.iter().copied()) {
        errors.add(
            format!("{list_field}[{pos}].{key_field}"),
            format!(
                "Duplicate {key_field} {}: each may appear only once in {list_field}.",
                keys[pos]
            ),
        );
    }
}

/// Record a field error for every submitted foreign id that is not in
/// `existing`.
pub fn check_references_exist(
    errors: &mut FieldErrors,
    list_field: &str,
    key_field: &str,
    keys: &[DbId],
    existing: &[DbId],
) {
    let existing: HashSet<DbId> = existing.iter().copied().collect();
    for (pos, key) in keys.iter().enumerate() {
        if !existing.contains(key) {
            errors.add(
                format!("{list_field}[{pos}].{key_field}"),
                format!("Invalid pk \"{key}\" - object does not exist."),
            );
        }
    }
}
