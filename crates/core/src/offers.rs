//! Offer type constants, notification email normalisation, and recipient
//! list construction.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Plain job application: only the base documents are required.
pub const OFFER_TYPE_CANDIDATURE: &str = "candidature";

/// Expression of interest.
pub const OFFER_TYPE_MANIFESTATION: &str = "manifestation";

/// Call for tenders (services).
pub const OFFER_TYPE_SERVICE_TENDER: &str = "appel_d_offre_service";

/// Call for tenders (equipment).
pub const OFFER_TYPE_EQUIPMENT_TENDER: &str = "appel_d_offre_equipement";

/// Consultation.
pub const OFFER_TYPE_CONSULTATION: &str = "consultation";

/// All valid offer types. Must match the `CHECK` constraint on `offers.type`.
pub const VALID_OFFER_TYPES: &[&str] = &[
    OFFER_TYPE_CANDIDATURE,
    OFFER_TYPE_MANIFESTATION,
    OFFER_TYPE_SERVICE_TENDER,
    OFFER_TYPE_EQUIPMENT_TENDER,
    OFFER_TYPE_CONSULTATION,
];

/// Upper bound on stored notification addresses per offer.
pub const MAX_NOTIFICATION_EMAILS: usize = 10;

static EMAIL_SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Validate that an offer type is one of the enumerated categories.
pub fn validate_offer_type(offer_type: &str) -> Result<(), CoreError> {
    if VALID_OFFER_TYPES.contains(&offer_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid offer type '{offer_type}'. Must be one of: {}",
            VALID_OFFER_TYPES.join(", ")
        )))
    }
}

/// Whether `email` has the simple `local@domain.tld` shape.
pub fn is_valid_email_shape(email: &str) -> bool {
    EMAIL_SHAPE_RE.is_match(email)
}

/// Drop malformed addresses and keep at most [`MAX_NOTIFICATION_EMAILS`].
pub fn normalize_notification_emails<I>(emails: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    emails
        .into_iter()
        .filter(|e| is_valid_email_shape(e))
        .take(MAX_NOTIFICATION_EMAILS)
        .collect()
}

/// Parse the `notification_emails` form field (a JSON array of strings).
///
/// Unparsable input and non-string entries are silently discarded.
pub fn parse_notification_emails(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<serde_json::Value>>(trimmed) {
        Ok(values) => normalize_notification_emails(
            values
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string)),
        ),
        Err(_) => Vec::new(),
    }
}

/// A single addressee of an offer notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub email: String,
    /// `true` for the offer creator, who is greeted by name.
    pub is_creator: bool,
}

/// Build the notification recipient list for an offer.
///
/// The creator's address always comes first. Addresses are compared
/// case-insensitively and each appears once.
pub fn notification_recipients(creator_email: &str, notification_emails: &[String]) -> Vec<Recipient> {
    let mut recipients: Vec<Recipient> = Vec::with_capacity(notification_emails.len() + 1);

    if !creator_email.is_empty() {
        recipients.push(Recipient {
            email: creator_email.to_string(),
            is_creator: true,
        });
    }

    for email in notification_emails {
        let seen = recipients
            .iter()
            .any(|r| r.email.eq_ignore_ascii_case(email));
        if !seen {
            recipients.push(Recipient {
                email: email.clone(),
                is_creator: false,
            });
        }
    }

    recipients
}
