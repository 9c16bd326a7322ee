//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! match. Ownership checks happen later, in the handler, once the resource
//! has been loaded.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use portal_core::error::CoreError;
use portal_core::roles::{is_staff, ROLE_ADMIN, ROLE_PUBLISHER};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires the offer publisher role (`comite_ajout`).
///
/// ```ignore
/// async fn create_offer(RequirePublisher(user): RequirePublisher) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequirePublisher(pub AuthUser);

impl FromRequestParts<AppState> for RequirePublisher {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_PUBLISHER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Offer publisher role required".into(),
            )));
        }
        Ok(RequirePublisher(user))
    }
}

/// Requires either HR committee role (`comite_ajout` or `comite_ouverture`).
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_staff(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Insufficient permissions".into(),
            )));
        }
        Ok(RequireStaff(user))
    }
}
