pub mod auth;
pub mod exercise;
pub mod health;
pub mod muscle_group;
pub mod plan;
pub mod workout;

use axum::routing::MethodRouter;
use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                  register (public)
/// /auth/login                     login (public)
/// /auth/refresh                   refresh (public)
/// /auth/logout                    logout (requires auth)
/// /auth/me                        get, delete own account (requires auth)
///
/// /muscle-groups                  list (public), create
/// /muscle-groups/{id}             get (public), replace, patch, delete
///
/// /exercises                      list (public), create
/// /exercises/{id}                 get (public), replace, patch, delete
///
/// /workouts                       list, create (requires auth)
/// /workouts/{id}                  get, replace, patch, delete (requires auth)
///
/// /plans                          list own, create (requires auth)
/// /plans/{id}                     get, replace, patch, delete (owner only)
/// /plans/{id}/activate            make the only active plan (owner only)
/// ```
///
/// Every path also answers with a trailing slash.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(muscle_group::router())
        .merge(exercise::router())
        .merge(workout::router())
        .merge(plan::router())
}

/// Register `path` and `path/` with the same handlers.
pub(crate) fn route_with_slash(
    router: Router<AppState>,
    path: &str,
    handlers: MethodRouter<AppState>,
) -> Router<AppState> {
    router
        .route(path, handlers.clone())
        .route(&format!("{path}/"), handlers)
}
