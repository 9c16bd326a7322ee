//! Application archival.
//!
//! Bundles every unarchived application of an expired offer into one zip:
//!
//! ```text
//! <offer title>/<applicant name>/CV.pdf
//! <offer title>/<applicant name>/Diploma.pdf
//! ...
//! <offer title>/<applicant name>/candidate_info.txt
//! ```
//!
//! Building is gated by ownership and by the 14-day archive window. It does
//! not set `archived_at`; rebuilding the same offer on the same day
//! overwrites the same file. Downloads are gated by ownership of the offer
//! whose id is embedded in the archive name.

use std::collections::HashSet;
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};

use portal_core::documents::DocumentSlot;
use portal_core::error::CoreError;
use portal_core::lifecycle::ensure_archivable;
use portal_core::naming::{
    archive_filename, archive_offer_id, file_extension, is_safe_archive_name, sanitize_segment,
};
use portal_core::ownership::ensure_can_access_offer_applications;
use portal_core::types::{DbId, Timestamp};
use portal_db::models::application::Application;
use portal_db::repositories::{ApplicationRepo, LogRepo, OfferRepo};
use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const SUMMARY_FILE: &str = "candidate_info.txt";

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Offer metadata written into every summary file.
#[derive(Debug, Clone)]
pub struct BundleOffer {
    pub title: String,
    pub offer_type: String,
    pub department: String,
}

#[derive(Debug, Clone)]
pub struct BundleDocument {
    pub slot: DocumentSlot,
    pub filename: String,
    pub filepath: PathBuf,
}

#[derive(Debug, Clone)]
pub struct BundleApplicant {
    pub full_name: String,
    pub email: String,
    pub tel_number: String,
    pub applicant_country: String,
    pub submitted_at: Timestamp,
    pub documents: Vec<BundleDocument>,
}

impl From<&Application> for BundleApplicant {
    fn from(app: &Application) -> Self {
        Self {
            full_name: app.full_name.clone(),
            email: app.email.clone(),
            tel_number: app.tel_number.clone(),
            applicant_country: app.applicant_country.clone(),
            submitted_at: app.created_at,
            documents: app
                .documents()
                .map(|(slot, doc)| BundleDocument {
                    slot,
                    filename: doc.filename.to_string(),
                    filepath: PathBuf::from(doc.filepath),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BundleStats {
    pub applications: usize,
    pub documents: usize,
    /// Documents whose file could not be read.
    pub skipped: usize,
}

/// Write the zip to `dest`. Blocking; run it on a blocking thread.
///
/// Each call writes its own temporary file next to `dest` and renames it
/// into place once complete. Overlapping builds of the same bundle never
/// share a partial file, and a download never sees one.
pub fn write_bundle(
    dest: &Path,
    offer: &BundleOffer,
    applicants: &[BundleApplicant],
) -> Result<BundleStats, BundleError> {
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut partial = tempfile::Builder::new()
        .prefix(".archive-")
        .suffix(".zip.part")
        .tempfile_in(dir)?;
    let stats = write_zip(partial.as_file_mut(), offer, applicants)?;
    partial.persist(dest).map_err(|e| e.error)?;
    Ok(stats)
}

fn write_zip<W: Write + Seek>(
    out: W,
    offer: &BundleOffer,
    applicants: &[BundleApplicant],
) -> Result<BundleStats, BundleError> {
    let mut zip = ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let offer_segment = sanitize_segment(&offer.title);
    let mut used_folders: HashSet<String> = HashSet::new();
    let mut stats = BundleStats::default();

    for applicant in applicants {
        let folder = unique_folder(
            &mut used_folders,
            &format!("{offer_segment}/{}", sanitize_segment(&applicant.full_name)),
        );

        for doc in &applicant.documents {
            let bytes = match std::fs::read(&doc.filepath) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(
                        path = %doc.filepath.display(),
                        slot = doc.slot.key(),
                        error = %e,
                        "Archive: document missing on disk, skipping",
                    );
                    stats.skipped += 1;
                    continue;
                }
            };
            let entry = format!(
                "{folder}/{}.{}",
                doc.slot.archive_name(),
                file_extension(&doc.filename)
            );
            zip.start_file(entry, options)?;
            zip.write_all(&bytes)?;
            stats.documents += 1;
        }

        zip.start_file(format!("{folder}/{SUMMARY_FILE}"), options)?;
        zip.write_all(candidate_summary(offer, applicant).as_bytes())?;
        stats.applications += 1;
    }

    zip.finish()?;
    Ok(stats)
}

/// Applicants sharing a sanitized name get `_2`, `_3`, ... suffixes.
fn unique_folder(used: &mut HashSet<String>, base: &str) -> String {
    let mut candidate = base.to_string();
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{base}_{n}");
        n += 1;
    }
    candidate
}

pub fn candidate_summary(offer: &BundleOffer, applicant: &BundleApplicant) -> String {
    format!(
        "Candidate Information\n\
         =====================\n\
         Name: {}\n\
         Email: {}\n\
         Phone: {}\n\
         Country: {}\n\
         \n\
         Offer: {}\n\
         Offer Type: {}\n\
         Department: {}\n\
         Application Date: {}\n",
        applicant.full_name,
        applicant.email,
        applicant.tel_number,
        applicant.applicant_country,
        offer.title,
        offer.offer_type,
        offer.department,
        applicant.submitted_at.format("%Y-%m-%d"),
    )
}

// ---------------------------------------------------------------------------
// Request-facing operations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveOutcome {
    pub archive_file: String,
    pub applications_count: usize,
}

/// Build the archive for `offer_id` on behalf of `user`.
pub async fn build_archive(
    state: &AppState,
    user: &AuthUser,
    offer_id: DbId,
) -> AppResult<ArchiveOutcome> {
    let offer = OfferRepo::find_listing_by_id(&state.pool, offer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Offer",
            id: offer_id,
        }))?;

    ensure_can_access_offer_applications(&user.role, user.user_id, offer.created_by)?;

    let today = state.clock.today();
    let days_since_expiry = ensure_archivable(offer.id, offer.deadline, today)?;

    let applications = ApplicationRepo::list_unarchived_for_offer(&state.pool, offer.id).await?;
    if applications.is_empty() {
        return Err(AppError::NotFound(
            "No applications found for this offer".into(),
        ));
    }

    let archive_file = archive_filename(offer.id, &offer.title, today);
    let dest = state.files.archive_path(&archive_file);
    tokio::fs::create_dir_all(state.files.archives_dir())
        .await
        .map_err(|e| AppError::InternalError(format!("Cannot create archives directory: {e}")))?;

    let bundle_offer = BundleOffer {
        title: offer.title.clone(),
        offer_type: offer.offer_type.clone(),
        department: offer.department_name.clone(),
    };
    let applicants: Vec<BundleApplicant> = applications.iter().map(BundleApplicant::from).collect();

    let stats = tokio::task::spawn_blocking(move || write_bundle(&dest, &bundle_offer, &applicants))
        .await
        .map_err(|e| AppError::InternalError(format!("Archive task failed: {e}")))?
        .map_err(|e| AppError::InternalError(format!("Archive build failed: {e}")))?;

    tracing::info!(
        offer_id = offer.id,
        user_id = user.user_id,
        days_since_expiry,
        applications = stats.applications,
        documents = stats.documents,
        skipped = stats.skipped,
        archive = %archive_file,
        "Application archive built",
    );

    LogRepo::append(
        &state.pool,
        &format!(
            "{} ({}) downloaded {} applications for offer \"{}\"",
            user.name, user.email, stats.applications, offer.title
        ),
    )
    .await?;

    Ok(ArchiveOutcome {
        archive_file,
        applications_count: stats.applications,
    })
}

/// Open a previously built bundle for streaming on behalf of `user`.
/// Returns the file and its size.
///
/// The bundle's offer is resolved from the name and checked with the same
/// rule as [`build_archive`]. Names that resolve to no offer read as missing.
pub async fn open_archive(
    state: &AppState,
    user: &AuthUser,
    name: &str,
) -> AppResult<(tokio::fs::File, u64)> {
    if !is_safe_archive_name(name) {
        return Err(AppError::BadRequest("Invalid archive file name".into()));
    }
    let offer_id =
        archive_offer_id(name).ok_or_else(|| AppError::NotFound("Archive file not found".into()))?;
    let offer = OfferRepo::find_by_id(&state.pool, offer_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Archive file not found".into()))?;
    ensure_can_access_offer_applications(&user.role, user.user_id, offer.created_by)?;

    let path = state.files.archive_path(name);
    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("Archive file not found".into()));
        }
        Err(e) => return Err(AppError::InternalError(format!("Cannot open archive: {e}"))),
    };
    let len = file
        .metadata()
        .await
        .map_err(|e| AppError::InternalError(format!("Cannot stat archive: {e}")))?
        .len();
    Ok((file, len))
}
