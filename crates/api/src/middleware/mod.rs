//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequirePublisher`] -- Requires the offer publisher role.
//! - [`rbac::RequireStaff`] -- Requires either HR committee role.

pub mod auth;
pub mod rbac;
