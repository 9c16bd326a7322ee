//! Route definitions for the `/projects` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                              -> list
/// POST   /                              -> create
/// PUT    /{id}                          -> update
/// DELETE /{id}                          -> delete
/// GET    /department/{department_id}    -> list_by_department
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/{id}", put(project::update).delete(project::delete))
        .route(
            "/department/{department_id}",
            get(project::list_by_department),
        )
}
