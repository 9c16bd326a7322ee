//! Handlers for the admin-only `/users` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use portal_core::error::CoreError;
use portal_core::offers::is_valid_email_shape;
use portal_core::roles::validate_role;
use portal_core::types::DbId;
use portal_db::models::user::{CreateUser, UpdateUser, UserResponse};
use portal_db::repositories::UserRepo;
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::handlers::audit;
use crate::middleware::rbac::RequireAdmin;
use crate::response::CreatedId;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

fn validation(msg: impl Into<String>) -> AppError {
    AppError::Core(CoreError::Validation(msg.into()))
}

fn check_email(email: &str) -> AppResult<()> {
    if is_valid_email_shape(email) {
        Ok(())
    } else {
        Err(validation("Invalid email address"))
    }
}

/// POST /users
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<CreatedId>)> {
    let name = input.name.trim();
    let email = input.email.trim();
    if name.is_empty() {
        return Err(validation("Name is required"));
    }
    check_email(email)?;
    validate_role(&input.role).map_err(validation)?;
    validate_password_strength(&input.password).map_err(validation)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role: input.role.clone(),
        },
    )
    .await?;

    audit(
        &state,
        &format!("{} created user {} ({})", admin.name, user.name, user.role),
    )
    .await;

    Ok((StatusCode::CREATED, Json(CreatedId { id: user.id })))
}

/// GET /users
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// PUT /users/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let name = input.name.as_deref().map(str::trim);
    if name == Some("") {
        return Err(validation("Name must not be empty"));
    }
    let email = input.email.as_deref().map(str::trim);
    if let Some(email) = email {
        check_email(email)?;
    }
    if let Some(role) = &input.role {
        validate_role(role).map_err(validation)?;
    }

    let user = UserRepo::update(
        &state.pool,
        id,
        &UpdateUser {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            role: input.role.clone(),
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    audit(&state, &format!("{} updated user {}", admin.name, user.name)).await;

    Ok(Json(UserResponse::from(user)))
}

/// DELETE /users/{id}
///
/// Users that still own departments, projects or offers cannot be removed.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(validation("You cannot delete your own account"));
    }
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    UserRepo::delete(&state.pool, id).await?;
    audit(&state, &format!("{} deleted user {}", admin.name, user.name)).await;

    Ok(StatusCode::NO_CONTENT)
}
