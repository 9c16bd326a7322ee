//! Handlers for the `/offers` resource.
//!
//! Reads are public. Writes are publisher-only, take `multipart/form-data`
//! (so a TDR PDF can ride along) and are restricted to the offer's creator.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use portal_core::documents::is_pdf;
use portal_core::error::CoreError;
use portal_core::lifecycle::{offer_status, OfferStatus};
use portal_core::offers::{parse_notification_emails, validate_offer_type};
use portal_core::ownership::ensure_owner;
use portal_core::types::DbId;
use portal_db::models::offer::{CreateOffer, Offer, OfferListing, UpdateOffer};
use portal_db::repositories::{ApplicationRepo, OfferRepo, ProjectRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::{audit, stream_file, Disposition};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequirePublisher;
use crate::state::AppState;
use crate::upload::{parse_date_field, parse_id_field, MultipartForm, UploadedFile};

const TDR_FIELD: &str = "tdr";

/// Public listing entry.
#[derive(Debug, Serialize)]
pub struct OfferSummary {
    #[serde(flatten)]
    pub offer: OfferListing,
    pub status: OfferStatus,
    pub tdr_url: Option<String>,
}

/// Public detail view. Carries `notification_emails` and the project id.
#[derive(Debug, Serialize)]
pub struct OfferDetail {
    #[serde(flatten)]
    pub offer: Offer,
    pub project_name: String,
    pub department_name: String,
    pub status: OfferStatus,
    pub tdr_url: Option<String>,
}

fn tdr_url(offer_id: DbId, tdr_filename: Option<&String>) -> Option<String> {
    tdr_filename.map(|_| format!("/offers/{offer_id}/tdr"))
}

fn offer_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Offer", id })
}

/// GET /offers
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<OfferSummary>>> {
    let today = state.clock.today();
    let offers = OfferRepo::list_public(&state.pool)
        .await?
        .into_iter()
        .map(|offer| OfferSummary {
            status: offer_status(offer.deadline, today),
            tdr_url: tdr_url(offer.id, offer.tdr_filename.as_ref()),
            offer,
        })
        .collect();
    Ok(Json(offers))
}

/// GET /offers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<OfferDetail>> {
    let offer = OfferRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| offer_not_found(id))?;
    let listing = OfferRepo::find_listing_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| offer_not_found(id))?;

    Ok(Json(OfferDetail {
        status: offer_status(offer.deadline, state.clock.today()),
        tdr_url: tdr_url(offer.id, offer.tdr_filename.as_ref()),
        project_name: listing.project_name,
        department_name: listing.department_name,
        offer,
    }))
}

/// GET /offers/{id}/tdr
///
/// Streams the terms-of-reference PDF inline.
pub async fn download_tdr(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let offer = OfferRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| offer_not_found(id))?;
    let (Some(filename), Some(filepath)) = (&offer.tdr_filename, &offer.tdr_filepath) else {
        return Err(AppError::NotFound("No TDR document for this offer".into()));
    };
    stream_file(
        filepath,
        "application/pdf",
        filename,
        Disposition::Inline,
        "TDR file not found",
    )
    .await
}

/// Validate and store an uploaded TDR. Returns `(original name, stored path)`.
async fn store_tdr(
    state: &AppState,
    title: &str,
    file: &UploadedFile,
) -> AppResult<(String, String)> {
    if !is_pdf(file.content_type.as_deref(), &file.file_name) {
        return Err(AppError::Core(CoreError::Validation(
            "TDR must be a PDF file".into(),
        )));
    }
    let path = state
        .files
        .save_tdr(title, &file.bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store TDR: {e}")))?;
    Ok((file.file_name.clone(), path.to_string_lossy().to_string()))
}

async fn ensure_project_owned(
    state: &AppState,
    project_id: DbId,
    user: &AuthUser,
) -> AppResult<()> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    ensure_owner("Project", project.created_by, user.user_id)?;
    Ok(())
}

/// POST /offers
pub async fn create(
    RequirePublisher(user): RequirePublisher,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Offer>)> {
    let form = MultipartForm::read(multipart).await?;

    let offer_type = form.require_text("type")?;
    validate_offer_type(offer_type)?;
    let title = form.require_text("title")?;
    let country = form.require_text("country")?;
    let reference = form.require_text("reference")?;
    let project_id = parse_id_field(&form, "project_id")?;
    let deadline = parse_date_field(form.require_text("deadline")?, "deadline")?;
    let notification_emails = form
        .raw("notification_emails")
        .map(parse_notification_emails)
        .unwrap_or_default();

    ensure_project_owned(&state, project_id, &user).await?;

    let (tdr_filename, tdr_filepath) = match form.file(TDR_FIELD) {
        Some(file) => {
            let (name, path) = store_tdr(&state, title, file).await?;
            (Some(name), Some(path))
        }
        None => (None, None),
    };

    let input = CreateOffer {
        offer_type: offer_type.to_string(),
        title: title.to_string(),
        description: form.text("description").map(str::to_string),
        country: country.to_string(),
        project_id,
        reference: reference.to_string(),
        created_by: user.user_id,
        deadline,
        tdr_filename,
        tdr_filepath: tdr_filepath.clone(),
        notification_emails,
    };

    let offer = match OfferRepo::create(&state.pool, &input).await {
        Ok(offer) => offer,
        Err(e) => {
            if let Some(path) = &tdr_filepath {
                state.files.remove_best_effort(path).await;
            }
            return Err(e.into());
        }
    };

    tracing::info!(offer_id = offer.id, user_id = user.user_id, "Offer created");
    audit(
        &state,
        &format!("{} created offer \"{}\"", user.name, offer.title),
    )
    .await;

    Ok((StatusCode::CREATED, Json(offer)))
}

/// PUT /offers/{id}
///
/// Only the fields present in the form are changed. Notification flags are
/// kept even when the deadline moves.
pub async fn update(
    RequirePublisher(user): RequirePublisher,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<Offer>> {
    let existing = OfferRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| offer_not_found(id))?;
    ensure_owner("Offer", existing.created_by, user.user_id)?;

    let form = MultipartForm::read(multipart).await?;

    let offer_type = form.text("type");
    if let Some(offer_type) = offer_type {
        validate_offer_type(offer_type)?;
    }
    let project_id = match form.text("project_id") {
        Some(_) => {
            let project_id = parse_id_field(&form, "project_id")?;
            ensure_project_owned(&state, project_id, &user).await?;
            Some(project_id)
        }
        None => None,
    };
    let deadline = form
        .text("deadline")
        .map(|v| parse_date_field(v, "deadline"))
        .transpose()?;
    let title = form.text("title");

    let replacement = match form.file(TDR_FIELD) {
        Some(file) => {
            let name_source = title.unwrap_or(existing.title.as_str());
            Some(store_tdr(&state, name_source, file).await?)
        }
        None => None,
    };

    let input = UpdateOffer {
        offer_type: offer_type.map(str::to_string),
        title: title.map(str::to_string),
        description: form.raw("description").map(|d| d.trim().to_string()),
        country: form.text("country").map(str::to_string),
        project_id,
        reference: form.text("reference").map(str::to_string),
        deadline,
        tdr_filename: replacement.as_ref().map(|(name, _)| name.clone()),
        tdr_filepath: replacement.as_ref().map(|(_, path)| path.clone()),
        notification_emails: form.raw("notification_emails").map(parse_notification_emails),
    };

    let offer = match OfferRepo::update(&state.pool, id, &input).await {
        Ok(Some(offer)) => offer,
        Ok(None) => return Err(offer_not_found(id)),
        Err(e) => {
            if let Some((_, path)) = &replacement {
                state.files.remove_best_effort(path).await;
            }
            return Err(e.into());
        }
    };

    if replacement.is_some() {
        if let Some(old) = &existing.tdr_filepath {
            state.files.remove_best_effort(old).await;
        }
    }

    audit(
        &state,
        &format!("{} updated offer \"{}\"", user.name, offer.title),
    )
    .await;

    Ok(Json(offer))
}

/// DELETE /offers/{id}
///
/// Applications cascade in the database; their stored documents and the
/// TDR are removed from disk afterwards.
pub async fn delete(
    RequirePublisher(user): RequirePublisher,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let offer = OfferRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| offer_not_found(id))?;
    ensure_owner("Offer", offer.created_by, user.user_id)?;

    let document_paths: Vec<String> = ApplicationRepo::list_for_offer(&state.pool, id)
        .await?
        .iter()
        .flat_map(|app| {
            app.documents()
                .map(|(_, doc)| doc.filepath.to_string())
                .collect::<Vec<_>>()
        })
        .collect();

    OfferRepo::delete(&state.pool, id).await?;

    if let Some(path) = &offer.tdr_filepath {
        state.files.remove_best_effort(path).await;
    }
    for path in &document_paths {
        state.files.remove_best_effort(path).await;
    }

    tracing::info!(
        offer_id = id,
        removed_documents = document_paths.len(),
        "Offer deleted"
    );
    audit(
        &state,
        &format!("{} deleted offer \"{}\"", user.name, offer.title),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
