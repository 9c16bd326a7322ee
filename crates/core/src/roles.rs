//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role` in
//! `20250101000001_create_users_table.sql`.

/// Manages users and reads the audit log.
pub const ROLE_ADMIN: &str = "admin";

/// Publishes offers under its own departments and projects.
pub const ROLE_PUBLISHER: &str = "comite_ajout";

/// Reviews and archives applications for every offer.
pub const ROLE_REVIEWER: &str = "comite_ouverture";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_PUBLISHER, ROLE_REVIEWER];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

/// Whether the role may read applications and bundle archives.
pub fn is_staff(role: &str) -> bool {
    role == ROLE_PUBLISHER || role == ROLE_REVIEWER
}
