//! Handlers for applicant submissions and the staff-facing application views.

use std::collections::BTreeMap;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use portal_core::documents::{check_required_documents, is_pdf, parse_document_slot, DocumentSlot};
use portal_core::error::CoreError;
use portal_core::lifecycle::{
    archive_window_status, days_since_expiry, offer_status, ArchiveWindowStatus, OfferStatus,
};
use portal_core::offers::is_valid_email_shape;
use portal_core::ownership::{application_scope, ensure_can_access_offer_applications};
use portal_core::types::DbId;
use portal_db::models::application::{Application, CreateApplication, StoredDocument};
use portal_db::models::offer::OfferApplicationCount;
use portal_db::repositories::{ApplicationRepo, OfferRepo};
use portal_events::templates::application_confirmation;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::{audit, stream_file, Disposition};
use crate::middleware::rbac::RequireStaff;
use crate::response::CreatedId;
use crate::state::AppState;
use crate::upload::{parse_id_field, MultipartForm};

/// One application as seen by staff, with links to each stored document.
#[derive(Debug, Serialize)]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: Application,
    pub offer_title: String,
    pub offer_type: String,
    pub offer_department: String,
    /// `<slot>_url` for every present document.
    #[serde(flatten)]
    pub document_urls: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct OfferApplicationSummary {
    #[serde(flatten)]
    pub counts: OfferApplicationCount,
    pub offer_status: OfferStatus,
    pub archive_window_status: ArchiveWindowStatus,
    pub days_since_expiry: i64,
}

fn document_urls(application: &Application) -> BTreeMap<String, String> {
    application
        .documents()
        .map(|(slot, _)| {
            (
                format!("{}_url", slot.key()),
                format!("/applications/{}/{}", application.id, slot.key()),
            )
        })
        .collect()
}

/// POST /apply
///
/// Public submission endpoint. Files are written only after every check
/// has passed; a failed insert removes them again.
pub async fn apply(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<CreatedId>)> {
    let form = MultipartForm::read(multipart).await?;

    let offer_id = parse_id_field(&form, "offer_id")?;
    let full_name = form.require_text("full_name")?;
    let email = form.require_text("email")?;
    let tel_number = form.require_text("tel_number")?;
    let applicant_country = form.require_text("applicant_country")?;

    if !is_valid_email_shape(email) {
        return Err(AppError::Core(CoreError::Validation(
            "A valid email address is required".into(),
        )));
    }

    let offer = OfferRepo::find_by_id(&state.pool, offer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Offer",
            id: offer_id,
        }))?;

    for slot in DocumentSlot::ALL {
        if let Some(file) = form.file(slot.key()) {
            if !is_pdf(file.content_type.as_deref(), &file.file_name) {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "{} must be a PDF file",
                    slot.key()
                ))));
            }
        }
    }
    check_required_documents(&offer.offer_type, |slot| form.has_file(slot.key()))?;

    if ApplicationRepo::exists_for_offer_and_email(&state.pool, offer.id, email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "You have already applied for this offer".into(),
        )));
    }

    let mut documents = Vec::new();
    for slot in DocumentSlot::ALL {
        let Some(file) = form.file(slot.key()) else {
            continue;
        };
        match state
            .files
            .save_applicant_document(full_name, slot, &file.bytes)
            .await
        {
            Ok(path) => documents.push(StoredDocument {
                slot,
                filename: file.file_name.clone(),
                filepath: path.to_string_lossy().to_string(),
            }),
            Err(e) => {
                remove_documents(&state, &documents).await;
                return Err(AppError::InternalError(format!(
                    "Failed to store {}: {e}",
                    slot.key()
                )));
            }
        }
    }

    let input = CreateApplication {
        offer_id: offer.id,
        full_name: full_name.to_string(),
        email: email.to_string(),
        tel_number: tel_number.to_string(),
        applicant_country: applicant_country.to_string(),
        documents,
    };
    let application = match ApplicationRepo::create(&state.pool, &input).await {
        Ok(application) => application,
        Err(e) => {
            remove_documents(&state, &input.documents).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        application_id = application.id,
        offer_id = offer.id,
        documents = input.documents.len(),
        "Application submitted"
    );
    audit(
        &state,
        &format!(
            "{} ({}) applied for offer \"{}\"",
            application.full_name, application.email, offer.title
        ),
    )
    .await;

    let body = application_confirmation(&application.full_name, &offer.title, state.clock.today());
    let subject = format!("Application Confirmation: {}", offer.title);
    if let Err(e) = state.mailer.send(&application.email, &subject, &body).await {
        tracing::warn!(
            application_id = application.id,
            error = %e,
            "Failed to send application confirmation"
        );
    }

    Ok((StatusCode::CREATED, Json(CreatedId { id: application.id })))
}

async fn remove_documents(state: &AppState, documents: &[StoredDocument]) {
    for doc in documents {
        state.files.remove_best_effort(&doc.filepath).await;
    }
}

/// GET /applications
pub async fn list(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ApplicationView>>> {
    let scope = application_scope(&user.role, user.user_id)?;
    let rows = ApplicationRepo::list_with_offer(&state.pool, scope.creator_filter()).await?;

    let views = rows
        .into_iter()
        .map(|row| ApplicationView {
            document_urls: document_urls(&row.application),
            application: row.application,
            offer_title: row.offer_title,
            offer_type: row.offer_type,
            offer_department: row.offer_department,
        })
        .collect();
    Ok(Json(views))
}

/// GET /applications/{id}/{document_type}
pub async fn download_document(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path((id, document_type)): Path<(DbId, String)>,
) -> AppResult<Response> {
    let slot = parse_document_slot(&document_type)?;
    let row = ApplicationRepo::find_with_offer(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Application",
            id,
        }))?;
    ensure_can_access_offer_applications(&user.role, user.user_id, row.offer_created_by)?;

    let document = row
        .application
        .document(slot)
        .ok_or_else(|| AppError::NotFound(format!("No {} document for this application", slot.key())))?;

    stream_file(
        document.filepath,
        "application/pdf",
        document.filename,
        Disposition::Inline,
        "Document file not found",
    )
    .await
}

/// GET /applications/summary
///
/// Per-offer application counts with the derived lifecycle state.
pub async fn summary(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<OfferApplicationSummary>>> {
    let scope = application_scope(&user.role, user.user_id)?;
    let today = state.clock.today();

    let rows = OfferRepo::application_counts(&state.pool, scope.creator_filter())
        .await?
        .into_iter()
        .map(|counts| OfferApplicationSummary {
            offer_status: offer_status(counts.deadline, today),
            archive_window_status: archive_window_status(counts.deadline, today),
            days_since_expiry: days_since_expiry(counts.deadline, today),
            counts,
        })
        .collect();
    Ok(Json(rows))
}
