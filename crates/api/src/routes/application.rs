//! Route definitions for applicant submissions and application review.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{application, archive};
use crate::state::AppState;

/// ```text
/// POST /apply                                    -> apply (public, multipart)
/// GET  /applications                             -> list
/// GET  /applications/summary                     -> summary
/// GET  /applications/{id}/{document_type}        -> download_document
/// POST /applications/archive/{offer_id}          -> archive::build
/// GET  /applications/archive/{filename}          -> archive::download
/// ```
///
/// Both archive operations share one path; the segment is an offer id for
/// `POST` and a bundle file name for `GET`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/apply", post(application::apply))
        .route("/applications", get(application::list))
        .route("/applications/summary", get(application::summary))
        .route(
            "/applications/archive/{key}",
            get(archive::download).post(archive::build),
        )
        .route(
            "/applications/{id}/{document_type}",
            get(application::download_document),
        )
}
