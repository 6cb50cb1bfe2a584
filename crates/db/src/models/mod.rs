//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Serialize` read models that expand nested children for responses
//! - Create / update DTOs consumed by the repositories

pub mod exercise;
pub mod muscle_group;
pub mod plan;
pub mod session;
pub mod user;
pub mod workout;
