//! Audit trail entries. Immutable once written (no updated_at).

use portal_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LogEntry {
    pub id: DbId,
    pub message: String,
    pub created_at: Timestamp,
}
