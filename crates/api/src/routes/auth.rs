//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use super::route_with_slash;
use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /register  -> register
/// POST   /login     -> login
/// POST   /refresh   -> refresh
/// POST   /logout    -> logout (requires auth)
/// GET    /me        -> me (requires auth)
/// DELETE /me        -> delete_me (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    let router = Router::new();
    let router = route_with_slash(router, "/register", post(auth::register));
    let router = route_with_slash(router, "/login", post(auth::login));
    let router = route_with_slash(router, "/refresh", post(auth::refresh));
    let router = route_with_slash(router, "/logout", post(auth::logout));
    route_with_slash(router, "/me", get(auth::me).delete(auth::delete_me))
}
