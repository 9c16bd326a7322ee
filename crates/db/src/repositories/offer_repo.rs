//! Repository for the `offers` table.
//!
//! Besides plain CRUD this holds the two queries the expiration sweep relies
//! on: selecting offers due for a notification stage and flipping that
//! stage's flag exactly once.

use portal_core::lifecycle::{NotificationStage, StageWindow};
use portal_core::types::{Date, DbId};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::offer::{
    CreateOffer, DueOffer, Offer, OfferApplicationCount, OfferListing, UpdateOffer,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, type, title, description, country, project_id, reference, created_by, \
                       deadline, tdr_filename, tdr_filepath, notification_emails, \
                       two_day_notified, one_day_notified, deadline_notified, \
                       created_at, updated_at";

const LISTING_SELECT: &str = "SELECT o.id, o.type, o.title, o.description, o.country, o.reference, \
                                     o.deadline, o.project_id, p.name AS project_name, \
                                     d.name AS department_name, o.created_by, o.tdr_filename, \
                                     o.created_at
                              FROM offers o
                              JOIN projects p ON p.id = o.project_id
                              JOIN departments d ON d.id = p.department_id";

/// Provides CRUD and lifecycle queries for offers.
pub struct OfferRepo;

impl OfferRepo {
    /// Insert a new offer, returning the created row. All flags start `false`.
    pub async fn create(pool: &PgPool, input: &CreateOffer) -> Result<Offer, sqlx::Error> {
        let query = format!(
            "INSERT INTO offers (type, title, description, country, project_id, reference,
                                 created_by, deadline, tdr_filename, tdr_filepath,
                                 notification_emails)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(&input.offer_type)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.country)
            .bind(input.project_id)
            .bind(&input.reference)
            .bind(input.created_by)
            .bind(input.deadline)
            .bind(&input.tdr_filename)
            .bind(&input.tdr_filepath)
            .bind(Json(&input.notification_emails))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Offer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM offers WHERE id = $1");
        sqlx::query_as::<_, Offer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Public listing, newest first.
    pub async fn list_public(pool: &PgPool) -> Result<Vec<OfferListing>, sqlx::Error> {
        let query = format!("{LISTING_SELECT} ORDER BY o.created_at DESC, o.id DESC");
        sqlx::query_as::<_, OfferListing>(&query)
            .fetch_all(pool)
            .await
    }

    /// One offer with its project and department names.
    pub async fn find_listing_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<OfferListing>, sqlx::Error> {
        let query = format!("{LISTING_SELECT} WHERE o.id = $1");
        sqlx::query_as::<_, OfferListing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update an offer. Only non-`None` fields in `input` are applied.
    ///
    /// Notification flags are left untouched even when the deadline moves.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOffer,
    ) -> Result<Option<Offer>, sqlx::Error> {
        let query = format!(
            "UPDATE offers SET
                type = COALESCE($2, type),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                country = COALESCE($5, country),
                project_id = COALESCE($6, project_id),
                reference = COALESCE($7, reference),
                deadline = COALESCE($8, deadline),
                tdr_filename = COALESCE($9, tdr_filename),
                tdr_filepath = COALESCE($10, tdr_filepath),
                notification_emails = COALESCE($11, notification_emails)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(id)
            .bind(&input.offer_type)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.country)
            .bind(input.project_id)
            .bind(&input.reference)
            .bind(input.deadline)
            .bind(&input.tdr_filename)
            .bind(&input.tdr_filepath)
            .bind(input.notification_emails.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete an offer; its applications cascade. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM offers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Offers whose deadline falls in `stage`'s window for `as_of` and whose
    /// flag for that stage is still `false`.
    pub async fn list_due(
        pool: &PgPool,
        stage: NotificationStage,
        as_of: Date,
    ) -> Result<Vec<DueOffer>, sqlx::Error> {
        let (op, date) = match stage.window(as_of) {
            StageWindow::On(date) => ("=", date),
            StageWindow::Before(date) => ("<", date),
        };
        let flag = stage.flag_column();
        let query = format!(
            "SELECT o.id, o.title, o.deadline, u.name AS creator_name,
                    u.email AS creator_email, o.notification_emails
             FROM offers o
             JOIN users u ON u.id = o.created_by
             WHERE o.deadline {op} $1 AND o.{flag} = FALSE
             ORDER BY o.deadline, o.id"
        );
        sqlx::query_as::<_, DueOffer>(&query)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Flip `stage`'s flag from `false` to `true`.
    ///
    /// Returns `false` when the flag was already set, so two overlapping
    /// sweeps cannot both claim the transition.
    pub async fn mark_notified(
        pool: &PgPool,
        id: DbId,
        stage: NotificationStage,
    ) -> Result<bool, sqlx::Error> {
        let flag = stage.flag_column();
        let query = format!("UPDATE offers SET {flag} = TRUE WHERE id = $1 AND {flag} = FALSE");
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Application counts per offer, ordered by deadline ascending.
    ///
    /// `created_by = None` covers every offer.
    pub async fn application_counts(
        pool: &PgPool,
        created_by: Option<DbId>,
    ) -> Result<Vec<OfferApplicationCount>, sqlx::Error> {
        sqlx::query_as::<_, OfferApplicationCount>(
            "SELECT o.id AS offer_id, o.title AS offer_title, o.type AS offer_type,
                    d.name AS offer_department, p.name AS offer_project,
                    o.deadline, o.created_by, COUNT(a.id) AS application_count
             FROM offers o
             JOIN projects p ON p.id = o.project_id
             JOIN departments d ON d.id = p.department_id
             LEFT JOIN applications a ON a.offer_id = o.id
             WHERE ($1::BIGINT IS NULL OR o.created_by = $1)
             GROUP BY o.id, d.name, p.name
             ORDER BY o.deadline ASC, o.id ASC",
        )
        .bind(created_by)
        .fetch_all(pool)
        .await
    }
}
