//! Local disk storage for uploaded documents and archive bundles.
//!
//! Layout under `files_dir`:
//!
//! ```text
//! tdr/<offer title>-tdr-<millis>-<rand>.pdf
//! applicants/<applicant name>/<slot>-<millis>-<rand>.pdf
//! ```
//!
//! Archive bundles live flat in `archives_dir`.

use std::io;
use std::path::{Path, PathBuf};

use portal_core::documents::DocumentSlot;
use portal_core::naming::sanitize_upload_name;

const TDR_DIR: &str = "tdr";
const APPLICANTS_DIR: &str = "applicants";

#[derive(Debug, Clone)]
pub struct FileStore {
    files_dir: PathBuf,
    archives_dir: PathBuf,
}

impl FileStore {
    pub fn new(files_dir: impl Into<PathBuf>, archives_dir: impl Into<PathBuf>) -> Self {
        Self {
            files_dir: files_dir.into(),
            archives_dir: archives_dir.into(),
        }
    }

    pub fn archives_dir(&self) -> &Path {
        &self.archives_dir
    }

    /// Store an offer's terms-of-reference PDF and return its path.
    pub async fn save_tdr(&self, offer_title: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let dir = self.files_dir.join(TDR_DIR);
        let stem = format!("{}-tdr", sanitize_upload_name(offer_title));
        write_unique(&dir, &stem, bytes).await
    }

    /// Store one applicant document and return its path.
    pub async fn save_applicant_document(
        &self,
        applicant_name: &str,
        slot: DocumentSlot,
        bytes: &[u8],
    ) -> io::Result<PathBuf> {
        let dir = self
            .files_dir
            .join(APPLICANTS_DIR)
            .join(sanitize_upload_name(applicant_name));
        write_unique(&dir, slot.key(), bytes).await
    }

    /// Path of a named bundle inside the archives directory.
    pub fn archive_path(&self, name: &str) -> PathBuf {
        self.archives_dir.join(name)
    }

    /// Delete a stored file, logging instead of failing.
    pub async fn remove_best_effort(&self, path: &str) {
        if path.is_empty() {
            return;
        }
        match tokio::fs::remove_file(path).await {
            Ok(()) => tracing::debug!(path, "Removed stored file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path, "Stored file already gone");
            }
            Err(e) => tracing::warn!(path, error = %e, "Failed to remove stored file"),
        }
    }
}

async fn write_unique(dir: &Path, stem: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::random::<u32>() % 1_000_000_000;
    let path = dir.join(format!("{stem}-{millis}-{suffix}.pdf"));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
