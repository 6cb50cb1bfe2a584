//! Route definitions for the `/exercises` resource.

use axum::routing::get;
use axum::Router;

use super::route_with_slash;
use crate::handlers::exercise;
use crate::state::AppState;

/// ```text
/// GET    /exercises         -> list
/// POST   /exercises         -> create
/// GET    /exercises/{id}    -> get_by_id
/// PUT    /exercises/{id}    -> replace
/// PATCH  /exercises/{id}    -> patch
/// DELETE /exercises/{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    let router = route_with_slash(
        Router::new(),
        "/exercises",
        get(exercise::list).post(exercise::create),
    );
    route_with_slash(
        router,
        "/exercises/{id}",
        get(exercise::get_by_id)
            .put(exercise::replace)
            .patch(exercise::patch)
            .delete(exercise::delete),
    )
}
