//! Route definitions for the `/plans` resource.

use axum::routing::{get, post};
use axum::Router;

use super::route_with_slash;
use crate::handlers::plan;
use crate::state::AppState;

/// All routes require auth and only ever see the caller's plans.
///
/// ```text
/// GET    /plans                 -> list
/// POST   /plans                 -> create
/// GET    /plans/{id}            -> get_by_id
/// PUT    /plans/{id}            -> replace
/// PATCH  /plans/{id}            -> patch
/// DELETE /plans/{id}            -> delete
/// POST   /plans/{id}/activate   -> activate
/// ```
pub fn router() -> Router<AppState> {
    let router = route_with_slash(Router::new(), "/plans", get(plan::list).post(plan::create));
    let router = route_with_slash(
        router,
        "/plans/{id}",
        get(plan::get_by_id)
            .put(plan::replace)
            .patch(plan::patch)
            .delete(plan::delete),
    );
    route_with_slash(router, "/plans/{id}/activate", post(plan::activate))
}
