//! Offer entity model, DTOs and read projections.

use portal_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// An offer row from the `offers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Offer {
    pub id: DbId,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub offer_type: String,
    pub title: String,
    pub description: Option<String>,
    pub country: String,
    pub project_id: DbId,
    pub reference: String,
    pub created_by: DbId,
    pub deadline: Date,
    pub tdr_filename: Option<String>,
    #[serde(skip_serializing)]
    pub tdr_filepath: Option<String>,
    pub notification_emails: Json<Vec<String>>,
    pub two_day_notified: bool,
    pub one_day_notified: bool,
    pub deadline_notified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public listing row: the offer with its project and department names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OfferListing {
    pub id: DbId,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub offer_type: String,
    pub title: String,
    pub description: Option<String>,
    pub country: String,
    pub reference: String,
    pub deadline: Date,
    pub project_id: DbId,
    pub project_name: String,
    pub department_name: String,
    pub created_by: DbId,
    pub tdr_filename: Option<String>,
    pub created_at: Timestamp,
}

/// An offer due for an expiration notice, joined with its creator.
#[derive(Debug, Clone, FromRow)]
pub struct DueOffer {
    pub id: DbId,
    pub title: String,
    pub deadline: Date,
    pub creator_name: String,
    pub creator_email: String,
    pub notification_emails: Json<Vec<String>>,
}

/// Per-offer application counts for the staff summary.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OfferApplicationCount {
    pub offer_id: DbId,
    pub offer_title: String,
    pub offer_type: String,
    pub offer_department: String,
    pub offer_project: String,
    pub deadline: Date,
    pub created_by: DbId,
    pub application_count: i64,
}

/// DTO for creating a new offer. Notification emails are already normalised.
#[derive(Debug, Clone)]
pub struct CreateOffer {
    pub offer_type: String,
    pub title: String,
    pub description: Option<String>,
    pub country: String,
    pub project_id: DbId,
    pub reference: String,
    pub created_by: DbId,
    pub deadline: Date,
    pub tdr_filename: Option<String>,
    pub tdr_filepath: Option<String>,
    pub notification_emails: Vec<String>,
}

/// DTO for updating an existing offer. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateOffer {
    pub offer_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub project_id: Option<DbId>,
    pub reference: Option<String>,
    pub deadline: Option<Date>,
    pub tdr_filename: Option<String>,
    pub tdr_filepath: Option<String>,
    pub notification_emails: Option<Vec<String>>,
}
