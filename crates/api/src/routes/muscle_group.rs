//! Route definitions for the `/muscle-groups` resource.

use axum::routing::get;
use axum::Router;

use super::route_with_slash;
use crate::handlers::muscle_group;
use crate::state::AppState;

/// ```text
/// GET    /muscle-groups         -> list
/// POST   /muscle-groups         -> create
/// GET    /muscle-groups/{id}    -> get_by_id
/// PUT    /muscle-groups/{id}    -> replace
/// PATCH  /muscle-groups/{id}    -> patch
/// DELETE /muscle-groups/{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    let router = route_with_slash(
        Router::new(),
        "/muscle-groups",
        get(muscle_group::list).post(muscle_group::create),
    );
    route_with_slash(
        router,
        "/muscle-groups/{id}",
        get(muscle_group::get_by_id)
            .put(muscle_group::replace)
            .patch(muscle_group::patch)
            .delete(muscle_group::delete),
    )
}
