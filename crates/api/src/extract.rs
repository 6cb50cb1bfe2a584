//! Request extractors with the crate's error shape.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `axum::Json` whose rejection is an [`AppError`], so malformed bodies get
/// the same `{"error","code"}` response as every other validation failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Path` with an [`AppError`] rejection. An id segment that
/// does not parse (e.g. `/exercises/abc`) names no resource, so it is a 404.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParam<T>(pub T);
