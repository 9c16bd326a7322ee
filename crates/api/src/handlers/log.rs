//! Handler for the admin-only audit log.

use axum::extract::State;
use axum::Json;
use portal_db::models::log::LogEntry;
use portal_db::repositories::LogRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /logs
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<LogEntry>>> {
    Ok(Json(LogRepo::list(&state.pool).await?))
}
