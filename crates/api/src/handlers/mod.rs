pub mod auth;
pub mod exercise;
pub mod muscle_group;
pub mod plan;
pub mod workout;
