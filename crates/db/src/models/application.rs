//! Application entity model and DTOs.
//!
//! Each of the ten document slots is stored as a `<key>_filename` /
//! `<key>_filepath` column pair; see [`DocumentSlot::key`].

use portal_core::documents::DocumentSlot;
use portal_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An application row from the `applications` table.
///
/// File paths are server-internal and never serialized.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Application {
    pub id: DbId,
    pub offer_id: DbId,
    pub full_name: String,
    pub email: String,
    pub tel_number: String,
    pub applicant_country: String,
    pub cv_filename: String,
    #[serde(skip_serializing)]
    pub cv_filepath: String,
    pub diplome_filename: String,
    #[serde(skip_serializing)]
    pub diplome_filepath: String,
    pub id_card_filename: String,
    #[serde(skip_serializing)]
    pub id_card_filepath: String,
    pub cover_letter_filename: String,
    #[serde(skip_serializing)]
    pub cover_letter_filepath: String,
    pub declaration_sur_honneur_filename: Option<String>,
    #[serde(skip_serializing)]
    pub declaration_sur_honneur_filepath: Option<String>,
    pub fiche_de_referencement_filename: Option<String>,
    #[serde(skip_serializing)]
    pub fiche_de_referencement_filepath: Option<String>,
    pub extrait_registre_filename: Option<String>,
    #[serde(skip_serializing)]
    pub extrait_registre_filepath: Option<String>,
    pub note_methodologique_filename: Option<String>,
    #[serde(skip_serializing)]
    pub note_methodologique_filepath: Option<String>,
    pub liste_references_filename: Option<String>,
    #[serde(skip_serializing)]
    pub liste_references_filepath: Option<String>,
    pub offre_financiere_filename: Option<String>,
    #[serde(skip_serializing)]
    pub offre_financiere_filepath: Option<String>,
    pub archived_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A stored document: original file name and server-side path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentRef<'a> {
    pub filename: &'a str,
    pub filepath: &'a str,
}

impl Application {
    /// The document stored in `slot`, if both its name and path are present.
    pub fn document(&self, slot: DocumentSlot) -> Option<DocumentRef<'_>> {
        let (filename, filepath) = match slot {
            DocumentSlot::Cv => (Some(&self.cv_filename), Some(&self.cv_filepath)),
            DocumentSlot::Diploma => (Some(&self.diplome_filename), Some(&self.diplome_filepath)),
            DocumentSlot::IdCard => (Some(&self.id_card_filename), Some(&self.id_card_filepath)),
            DocumentSlot::CoverLetter => (
                Some(&self.cover_letter_filename),
                Some(&self.cover_letter_filepath),
            ),
            DocumentSlot::DeclarationHonneur => (
                self.declaration_sur_honneur_filename.as_ref(),
                self.declaration_sur_honneur_filepath.as_ref(),
            ),
            DocumentSlot::FicheReferencement => (
                self.fiche_de_referencement_filename.as_ref(),
                self.fiche_de_referencement_filepath.as_ref(),
            ),
            DocumentSlot::ExtraitRegistre => (
                self.extrait_registre_filename.as_ref(),
                self.extrait_registre_filepath.as_ref(),
            ),
            DocumentSlot::NoteMethodologique => (
                self.note_methodologique_filename.as_ref(),
                self.note_methodologique_filepath.as_ref(),
            ),
            DocumentSlot::ListeReferences => (
                self.liste_references_filename.as_ref(),
                self.liste_references_filepath.as_ref(),
            ),
            DocumentSlot::OffreFinanciere => (
                self.offre_financiere_filename.as_ref(),
                self.offre_financiere_filepath.as_ref(),
            ),
        };
        match (filename, filepath) {
            (Some(filename), Some(filepath)) if !filepath.is_empty() => Some(DocumentRef {
                filename: filename.as_str(),
                filepath: filepath.as_str(),
            }),
            _ => None,
        }
    }

    /// Every present document in slot order.
    pub fn documents(&self) -> impl Iterator<Item = (DocumentSlot, DocumentRef<'_>)> {
        DocumentSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.document(slot).map(|doc| (slot, doc)))
    }
}

/// An application joined with the offer it was submitted to.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationWithOffer {
    #[sqlx(flatten)]
    pub application: Application,
    pub offer_title: String,
    pub offer_type: String,
    pub offer_department: String,
    pub offer_created_by: DbId,
}

/// A document written to the file store, ready to be recorded.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub slot: DocumentSlot,
    pub filename: String,
    pub filepath: String,
}

/// DTO for inserting a new application.
#[derive(Debug, Clone)]
pub struct CreateApplication {
    pub offer_id: DbId,
    pub full_name: String,
    pub email: String,
    pub tel_number: String,
    pub applicant_country: String,
    pub documents: Vec<StoredDocument>,
}

impl CreateApplication {
    pub fn document(&self, slot: DocumentSlot) -> Option<&StoredDocument> {
        self.documents.iter().find(|d| d.slot == slot)
    }
}
