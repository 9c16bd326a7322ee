pub mod application;
pub mod archive;
pub mod auth;
pub mod department;
pub mod email;
pub mod log;
pub mod offer;
pub mod project;
pub mod user;

use std::io;
use std::path::Path;

use axum::body::Body;
use axum::http::header;
use axum::http::StatusCode;
use axum::response::Response;
use portal_db::repositories::LogRepo;
use tokio_util::io::ReaderStream;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Append an audit log line. Failures are logged and never fail the request.
pub(crate) async fn audit(state: &AppState, message: &str) {
    if let Err(e) = LogRepo::append(&state.pool, message).await {
        tracing::warn!(error = %e, "Failed to write audit log entry");
    }
}

/// How a streamed file should be presented by the browser.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Disposition {
    Inline,
    Attachment,
}

/// Stream a stored file from disk. A missing file is a 404 with `missing_message`.
pub(crate) async fn stream_file(
    path: impl AsRef<Path>,
    content_type: &str,
    download_name: &str,
    disposition: Disposition,
    missing_message: &str,
) -> AppResult<Response> {
    let file = match tokio::fs::File::open(path.as_ref()).await {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(missing_message.to_string()));
        }
        Err(e) => return Err(AppError::InternalError(e.to_string())),
    };
    let len = file
        .metadata()
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .len();
    file_response(file, len, content_type, download_name, disposition)
}

pub(crate) fn file_response(
    file: tokio::fs::File,
    len: u64,
    content_type: &str,
    download_name: &str,
    disposition: Disposition,
) -> AppResult<Response> {
    let kind = match disposition {
        Disposition::Inline => "inline",
        Disposition::Attachment => "attachment",
    };
    let safe_name: String = download_name
        .chars()
        .map(|c| if c == '"' || c.is_control() { '_' } else { c })
        .collect();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, len.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            format!("{kind}; filename=\"{safe_name}\""),
        )
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| AppError::InternalError(format!("Failed to build file response: {e}")))
}
