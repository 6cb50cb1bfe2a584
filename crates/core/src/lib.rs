//! Domain rules shared by the storage and HTTP layers.
//!
//! Nothing in this crate touches the database or the network; it holds the
//! error taxonomy, the coded enumerations and the validation helpers that
//! both `gymplan-db` and `gymplan-api` build on.

pub mod activation;
pub mod aggregate;
pub mod error;
pub mod patch;
pub mod schedule;
pub mod types;
