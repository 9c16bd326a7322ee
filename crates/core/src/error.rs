use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Child records still reference the entity being deleted.
    #[error("Has dependents: {0}")]
    HasDependents(String),

    /// The offer expired too long ago for its applications to be bundled.
    #[error("Archive window closed for offer {offer_id} ({days_since_expiry} days since expiry)")]
    ArchiveWindowClosed {
        offer_id: DbId,
        days_since_expiry: i64,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}
