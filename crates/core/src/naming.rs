//! File and folder naming for uploads and archive bundles.

use crate::types::{Date, DbId};

const ARCHIVE_PREFIX: &str = "archived_applications_";
const ARCHIVE_EXTENSION: &str = ".zip";

/// Replace every character that is not an ASCII letter or digit with `_`.
pub fn sanitize_segment(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// [`sanitize_segment`], lowercased. Used for upload directories and stems.
pub fn sanitize_upload_name(input: &str) -> String {
    sanitize_segment(input).to_ascii_lowercase()
}

/// Extension of a stored file name, lowercased, falling back to `pdf`.
pub fn file_extension(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() && !ext.contains(['/', '\\']) => {
            ext.to_ascii_lowercase()
        }
        _ => "pdf".to_string(),
    }
}

/// Bundle name for an offer's applications built on `date`.
///
/// The offer id keeps offers with colliding titles apart. The same offer
/// rebuilt on the same day yields the same name.
pub fn archive_filename(offer_id: DbId, offer_title: &str, date: Date) -> String {
    format!(
        "{ARCHIVE_PREFIX}{offer_id}_{}_{}{ARCHIVE_EXTENSION}",
        sanitize_segment(offer_title),
        date.format("%Y-%m-%d")
    )
}

/// Offer id embedded in a name produced by [`archive_filename`].
pub fn archive_offer_id(name: &str) -> Option<DbId> {
    let rest = name
        .strip_prefix(ARCHIVE_PREFIX)?
        .strip_suffix(ARCHIVE_EXTENSION)?;
    let (id, _) = rest.split_once('_')?;
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}

/// A requested archive name must be a bare file name inside the archives directory.
pub fn is_safe_archive_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
        && !name.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_segment() {
        assert_eq!(sanitize_segment("Dev Rust (Senior)"), "Dev_Rust__Senior_");
        assert_eq!(sanitize_segment("Élodie"), "_lodie");
        assert_eq!(sanitize_upload_name("Jane DOE"), "jane_doe");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("cv.PDF"), "pdf");
        assert_eq!(file_extension("scan.final.docx"), "docx");
        assert_eq!(file_extension("noext"), "pdf");
        assert_eq!(file_extension(".hidden"), "pdf");
    }

    #[test]
    fn test_archive_filename() {
        let date = Date::from_ymd_opt(2025, 1, 20).unwrap();
        assert_eq!(
            archive_filename(7, "Data Analyst", date),
            "archived_applications_7_Data_Analyst_2025-01-20.zip"
        );
    }

    #[test]
    fn test_archive_filename_separates_colliding_titles() {
        let date = Date::from_ymd_opt(2025, 1, 20).unwrap();
        let a = archive_filename(3, "Data Analyst", date);
        let b = archive_filename(4, "Data-Analyst", date);
        assert_ne!(a, b);
        assert_eq!(archive_offer_id(&a), Some(3));
        assert_eq!(archive_offer_id(&b), Some(4));
    }

    #[test]
    fn test_archive_offer_id_rejects_foreign_names() {
        assert_eq!(archive_offer_id("archived_applications_Data_2025-01-20.zip"), None);
        assert_eq!(archive_offer_id("archived_applications_12_X_2025-01-20.tar"), None);
        assert_eq!(archive_offer_id("report_12_X.zip"), None);
        assert_eq!(archive_offer_id("archived_applications_+5_X_2025-01-20.zip"), None);
        assert_eq!(
            archive_offer_id("archived_applications_12_Dev_Ops_2025-01-20.zip"),
            Some(12)
        );
    }

    #[test]
    fn test_safe_archive_names() {
        assert!(is_safe_archive_name("archived_applications_1_X_2025-01-20.zip"));
        assert!(!is_safe_archive_name("../secret.zip"));
        assert!(!is_safe_archive_name("a/b.zip"));
        assert!(!is_safe_archive_name("a\\b.zip"));
        assert!(!is_safe_archive_name(""));
    }
}
