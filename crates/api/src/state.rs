use std::sync::Arc;

use portal_core::clock::Clock;
use portal_events::Mailer;

use crate::config::ServerConfig;
use crate::storage::FileStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: portal_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Outbound email. [`portal_events::DisabledMailer`] when SMTP is not configured.
    pub mailer: Arc<dyn Mailer>,
    /// Source of "today" for deadline checks.
    pub clock: Arc<dyn Clock>,
    /// Uploaded documents and archive bundles on local disk.
    pub files: Arc<FileStore>,
}
