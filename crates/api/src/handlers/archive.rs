//! Handlers for building and downloading application archives.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use portal_core::types::DbId;

use crate::engine::archive::{build_archive, open_archive, ArchiveOutcome};
use crate::error::AppResult;
use crate::handlers::{file_response, Disposition};
use crate::middleware::rbac::RequireStaff;
use crate::state::AppState;

/// POST /applications/archive/{offer_id}
///
/// Bundles every application of an expired offer into a zip. The
/// applications are not marked archived; each call re-bundles them.
pub async fn build(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(offer_id): Path<DbId>,
) -> AppResult<Json<ArchiveOutcome>> {
    let outcome = build_archive(&state, &user, offer_id).await?;
    Ok(Json(outcome))
}

/// GET /applications/archive/{filename}
///
/// Publishers may only download bundles of their own offers.
pub async fn download(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let (file, len) = open_archive(&state, &user, &filename).await?;
    file_response(file, len, "application/zip", &filename, Disposition::Attachment)
}
