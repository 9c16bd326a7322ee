pub mod admin;
pub mod application;
pub mod auth;
pub mod department;
pub mod health;
pub mod offer;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree, mounted at the root.
///
/// Route hierarchy:
///
/// ```text
/// /login                                     login (public)
///
/// /users                                     list, create (admin only)
/// /users/{id}                                update, delete (admin only)
/// /logs                                      audit log (admin only)
/// /test-email                                send a test email (admin only)
///
/// /departments                               list, create (publisher, own)
/// /departments/{id}                          update, delete (owner)
///
/// /projects                                  list, create (publisher, own)
/// /projects/{id}                             update, delete (owner)
/// /projects/department/{department_id}       list by department (owner)
///
/// /offers                                    list (public), create (publisher)
/// /offers/{id}                               get (public), update, delete (owner)
/// /offers/{id}/tdr                           terms of reference PDF (public)
///
/// /apply                                     submit an application (public)
/// /applications                              list (staff, scoped)
/// /applications/summary                      per-offer counts and window state
/// /applications/{id}/{document_type}         stream one document
/// /applications/archive/{offer_id}           build archive (POST)
/// /applications/archive/{filename}           download archive (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(admin::router())
        .nest("/departments", department::router())
        .nest("/projects", project::router())
        .nest("/offers", offer::router())
        .merge(application::router())
}
