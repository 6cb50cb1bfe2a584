//! Route definitions for the `/workouts` resource.

use axum::routing::get;
use axum::Router;

use super::route_with_slash;
use crate::handlers::workout;
use crate::state::AppState;

/// ```text
/// GET    /workouts         -> list
/// POST   /workouts         -> create
/// GET    /workouts/{id}    -> get_by_id
/// PUT    /workouts/{id}    -> replace
/// PATCH  /workouts/{id}    -> patch
/// DELETE /workouts/{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    let router = route_with_slash(
        Router::new(),
        "/workouts",
        get(workout::list).post(workout::create),
    );
    route_with_slash(
        router,
        "/workouts/{id}",
        get(workout::get_by_id)
            .put(workout::replace)
            .patch(workout::patch)
            .delete(workout::delete),
    )
}
