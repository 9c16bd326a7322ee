//! Handler for `POST /test-email`.

use axum::extract::State;
use axum::Json;
use portal_core::error::CoreError;
use portal_core::offers::is_valid_email_shape;
use portal_events::templates::test_email;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::audit;
use crate::middleware::rbac::RequireAdmin;
use crate::response::MessageResponse;
use crate::state::AppState;

const DEFAULT_SUBJECT: &str = "Test Email from HR Job Portal";
const DEFAULT_MESSAGE: &str = "This is a test email to verify the email configuration.";

#[derive(Debug, Deserialize)]
pub struct TestEmailRequest {
    pub to: String,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// POST /test-email
///
/// Send one email through the configured dispatcher.
pub async fn send_test(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<TestEmailRequest>,
) -> AppResult<Json<MessageResponse>> {
    let to = input.to.trim();
    if !is_valid_email_shape(to) {
        return Err(AppError::Core(CoreError::Validation(
            "A valid recipient address is required".into(),
        )));
    }
    let subject = input
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SUBJECT);
    let message = input
        .message
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_MESSAGE);

    let body = test_email(message, &admin.name, &admin.email);
    state
        .mailer
        .send(to, subject, &body)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to send test email: {e}")))?;

    audit(&state, &format!("{} sent a test email to {to}", admin.name)).await;

    Ok(Json(MessageResponse::new(format!(
        "Test email sent successfully to {to}"
    ))))
}
