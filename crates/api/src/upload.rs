//! Buffered `multipart/form-data` parsing shared by the offer and apply forms.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::Multipart;
use portal_core::error::CoreError;
use portal_core::types::DbId;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// All parts of a multipart request, split into text fields and files.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Drain `multipart` into memory.
    ///
    /// A part with a file name is a file. Empty file inputs (no name, no
    /// bytes) are dropped so "no file chosen" reads as absent.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name.is_empty() {
                continue;
            }
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name,
                            content_type,
                            bytes,
                        },
                    );
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.fields.insert(name, text);
                }
            }
        }
        Ok(form)
    }

    /// Trimmed text field, `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn require_text(&self, name: &str) -> AppResult<&str> {
        self.text(name).ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!("{name} is required")))
        })
    }

    /// Raw (untrimmed) field value, present even when blank.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }
}

/// Parse a positive id out of a text field.
pub fn parse_id_field(form: &MultipartForm, name: &str) -> AppResult<DbId> {
    form.require_text(name)?
        .parse::<DbId>()
        .map_err(|_| AppError::Core(CoreError::Validation(format!("{name} must be an integer"))))
}

/// Parse a `YYYY-MM-DD` date field.
pub fn parse_date_field(value: &str, name: &str) -> AppResult<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::Core(CoreError::Validation(format!(
            "{name} must be a date in YYYY-MM-DD format"
        )))
    })
}
