//! Admin-only routes: user management, the audit log and mail checks.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{email, log, user};
use crate::state::AppState;

/// ```text
/// GET    /users         -> list
/// POST   /users         -> create
/// PUT    /users/{id}    -> update
/// DELETE /users/{id}    -> delete
/// GET    /logs          -> list
/// POST   /test-email    -> send_test
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(user::list).post(user::create))
        .route("/users/{id}", put(user::update).delete(user::delete))
        .route("/logs", get(log::list))
        .route("/test-email", post(email::send_test))
}
