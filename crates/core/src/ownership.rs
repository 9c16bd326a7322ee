//! Creator-scoped access rules.
//!
//! Departments, projects and offers belong to the publisher who created them.
//! Reviewers see every application; publishers see only applications to
//! their own offers; admins manage users and nothing else.

use crate::error::CoreError;
use crate::roles::{ROLE_PUBLISHER, ROLE_REVIEWER};
use crate::types::DbId;

/// Fail with `Forbidden` unless `user_id` created the resource.
pub fn ensure_owner(resource: &str, creator_id: DbId, user_id: DbId) -> Result<(), CoreError> {
    if creator_id == user_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "{resource} not found or access denied"
        )))
    }
}

/// Which applications a staff member may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationScope {
    All,
    /// Only applications to offers created by this user.
    CreatedBy(DbId),
}

impl ApplicationScope {
    pub fn creator_filter(self) -> Option<DbId> {
        match self {
            Self::All => None,
            Self::CreatedBy(id) => Some(id),
        }
    }

    pub fn permits(self, offer_creator: DbId) -> bool {
        match self {
            Self::All => true,
            Self::CreatedBy(id) => id == offer_creator,
        }
    }
}

pub fn application_scope(role: &str, user_id: DbId) -> Result<ApplicationScope, CoreError> {
    match role {
        ROLE_REVIEWER => Ok(ApplicationScope::All),
        ROLE_PUBLISHER => Ok(ApplicationScope::CreatedBy(user_id)),
        _ => Err(CoreError::Forbidden(
            "Insufficient permissions to view applications".into(),
        )),
    }
}

/// Combined role and ownership gate for reading or archiving one offer's applications.
pub fn ensure_can_access_offer_applications(
    role: &str,
    user_id: DbId,
    offer_creator: DbId,
) -> Result<(), CoreError> {
    if application_scope(role, user_id)?.permits(offer_creator) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Offer not found or access denied".into(),
        ))
    }
}
