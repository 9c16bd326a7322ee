//! Route definitions for the `/offers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::offer;
use crate::state::AppState;

/// Routes mounted at `/offers`.
///
/// ```text
/// GET    /            -> list (public)
/// POST   /            -> create (multipart)
/// GET    /{id}        -> get_by_id (public)
/// PUT    /{id}        -> update (multipart)
/// DELETE /{id}        -> delete
/// GET    /{id}/tdr    -> download_tdr (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(offer::list).post(offer::create))
        .route(
            "/{id}",
            get(offer::get_by_id)
                .put(offer::update)
                .delete(offer::delete),
        )
        .route("/{id}/tdr", get(offer::download_tdr))
}
