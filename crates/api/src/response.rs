//! Shared response payloads for API handlers.
//!
//! Resource endpoints return the resource itself. The small acknowledgement
//! shapes below are shared by several handlers.

use portal_core::types::DbId;
use serde::Serialize;

/// `{ "id": ... }` returned by create endpoints.
#[derive(Debug, Serialize)]
pub struct CreatedId {
    pub id: DbId,
}

/// `{ "message": ... }` returned by mutations with nothing else to report.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
