//! Handler for `POST /login`.

use axum::extract::State;
use axum::Json;
use portal_core::error::CoreError;
use portal_core::types::DbId;
use portal_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, TokenSubject};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::handlers::audit;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid email or password".into(),
    ))
}

/// POST /login
///
/// Authenticate with email + password and return an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = input.email.trim();
    if email.is_empty() || input.password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Email and password are required".into(),
        )));
    }

    let user = UserRepo::find_by_email(&state.pool, email)
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid_credentials());
    }

    let token = generate_access_token(
        TokenSubject {
            user_id: user.id,
            name: &user.name,
            email: &user.email,
            role: &user.role,
        },
        &state.config.jwt,
    )
    .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    audit(&state, &format!("{} ({}) logged in", user.name, user.email)).await;

    Ok(Json(LoginResponse {
        token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserInfo {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        },
    }))
}
