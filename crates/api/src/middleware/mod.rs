//! Request extractors that gate handlers on authentication.

pub mod auth;
