//! Repository for the `applications` table.

use portal_core::documents::DocumentSlot;
use portal_core::types::DbId;
use sqlx::PgPool;

use crate::models::application::{Application, ApplicationWithOffer, CreateApplication};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, offer_id, full_name, email, tel_number, applicant_country, \
                       cv_filename, cv_filepath, diplome_filename, diplome_filepath, \
                       id_card_filename, id_card_filepath, \
                       cover_letter_filename, cover_letter_filepath, \
                       declaration_sur_honneur_filename, declaration_sur_honneur_filepath, \
                       fiche_de_referencement_filename, fiche_de_referencement_filepath, \
                       extrait_registre_filename, extrait_registre_filepath, \
                       note_methodologique_filename, note_methodologique_filepath, \
                       liste_references_filename, liste_references_filepath, \
                       offre_financiere_filename, offre_financiere_filepath, \
                       archived_at, created_at, updated_at";

const WITH_OFFER_SELECT: &str = "SELECT a.*, o.title AS offer_title, o.type AS offer_type,
                                        d.name AS offer_department,
                                        o.created_by AS offer_created_by
                                 FROM applications a
                                 JOIN offers o ON o.id = a.offer_id
                                 JOIN projects p ON p.id = o.project_id
                                 JOIN departments d ON d.id = p.department_id";

pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Insert a new application, returning the created row.
    ///
    /// Fails with `uq_applications_offer_email` when the applicant already
    /// applied to the offer.
    pub async fn create(
        pool: &PgPool,
        input: &CreateApplication,
    ) -> Result<Application, sqlx::Error> {
        let mut columns = vec![
            "offer_id".to_string(),
            "full_name".to_string(),
            "email".to_string(),
            "tel_number".to_string(),
            "applicant_country".to_string(),
        ];
        for slot in DocumentSlot::ALL {
            columns.push(format!("{}_filename", slot.key()));
            columns.push(format!("{}_filepath", slot.key()));
        }
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();
        let query = format!(
            "INSERT INTO applications ({}) VALUES ({}) RETURNING {COLUMNS}",
            columns.join(", "),
            placeholders.join(", ")
        );

        let mut q = sqlx::query_as::<_, Application>(&query)
            .bind(input.offer_id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.tel_number)
            .bind(&input.applicant_country);
        for slot in DocumentSlot::ALL {
            let doc = input.document(slot);
            q = q
                .bind(doc.map(|d| d.filename.as_str()))
                .bind(doc.map(|d| d.filepath.as_str()));
        }
        q.fetch_one(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One application with the offer it belongs to.
    pub async fn find_with_offer(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ApplicationWithOffer>, sqlx::Error> {
        let query = format!("{WITH_OFFER_SELECT} WHERE a.id = $1");
        sqlx::query_as::<_, ApplicationWithOffer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether `email` already applied to `offer_id`.
    pub async fn exists_for_offer_and_email(
        pool: &PgPool,
        offer_id: DbId,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM applications WHERE offer_id = $1 AND email = $2)",
        )
        .bind(offer_id)
        .bind(email)
        .fetch_one(pool)
        .await
    }

    /// Applications joined with their offers, newest first.
    ///
    /// `offer_created_by = None` lists every application.
    pub async fn list_with_offer(
        pool: &PgPool,
        offer_created_by: Option<DbId>,
    ) -> Result<Vec<ApplicationWithOffer>, sqlx::Error> {
        let query = format!(
            "{WITH_OFFER_SELECT}
             WHERE ($1::BIGINT IS NULL OR o.created_by = $1)
             ORDER BY a.created_at DESC, a.id DESC"
        );
        sqlx::query_as::<_, ApplicationWithOffer>(&query)
            .bind(offer_created_by)
            .fetch_all(pool)
            .await
    }

    /// Applications to `offer_id` that have not been marked archived.
    pub async fn list_unarchived_for_offer(
        pool: &PgPool,
        offer_id: DbId,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications
             WHERE offer_id = $1 AND archived_at IS NULL
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(offer_id)
            .fetch_all(pool)
            .await
    }

    /// Every application to `offer_id`, archived or not.
    pub async fn list_for_offer(
        pool: &PgPool,
        offer_id: DbId,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications WHERE offer_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(offer_id)
            .fetch_all(pool)
            .await
    }
}
