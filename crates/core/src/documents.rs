//! Application document slots.
//!
//! Every application carries up to ten PDF documents. Four are always
//! required; the remaining six are required for every offer type except
//! [`OFFER_TYPE_CANDIDATURE`].

use crate::error::CoreError;
use crate::offers::OFFER_TYPE_CANDIDATURE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentSlot {
    Cv,
    Diploma,
    IdCard,
    CoverLetter,
    DeclarationHonneur,
    FicheReferencement,
    ExtraitRegistre,
    NoteMethodologique,
    ListeReferences,
    OffreFinanciere,
}

impl DocumentSlot {
    pub const ALL: [DocumentSlot; 10] = [
        Self::Cv,
        Self::Diploma,
        Self::IdCard,
        Self::CoverLetter,
        Self::DeclarationHonneur,
        Self::FicheReferencement,
        Self::ExtraitRegistre,
        Self::NoteMethodologique,
        Self::ListeReferences,
        Self::OffreFinanciere,
    ];

    pub const BASE: [DocumentSlot; 4] = [Self::Cv, Self::Diploma, Self::IdCard, Self::CoverLetter];

    pub const TENDER: [DocumentSlot; 6] = [
        Self::DeclarationHonneur,
        Self::FicheReferencement,
        Self::ExtraitRegistre,
        Self::NoteMethodologique,
        Self::ListeReferences,
        Self::OffreFinanciere,
    ];

    /// Multipart field name and column prefix (`<key>_filename`, `<key>_filepath`).
    pub fn key(self) -> &'static str {
        match self {
            Self::Cv => "cv",
            Self::Diploma => "diplome",
            Self::IdCard => "id_card",
            Self::CoverLetter => "cover_letter",
            Self::DeclarationHonneur => "declaration_sur_honneur",
            Self::FicheReferencement => "fiche_de_referencement",
            Self::ExtraitRegistre => "extrait_registre",
            Self::NoteMethodologique => "note_methodologique",
            Self::ListeReferences => "liste_references",
            Self::OffreFinanciere => "offre_financiere",
        }
    }

    /// File stem used inside archive bundles.
    pub fn archive_name(self) -> &'static str {
        match self {
            Self::Cv => "CV",
            Self::Diploma => "Diploma",
            Self::IdCard => "ID_Card",
            Self::CoverLetter => "Cover_Letter",
            Self::DeclarationHonneur => "Declaration_Honneur",
            Self::FicheReferencement => "Fiche_Referencement",
            Self::ExtraitRegistre => "Extrait_Registre",
            Self::NoteMethodologique => "Note_Methodologique",
            Self::ListeReferences => "Liste_References",
            Self::OffreFinanciere => "Offre_Financiere",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.key() == key)
    }

    pub fn is_base(self) -> bool {
        Self::BASE.contains(&self)
    }
}

/// Parse a document type path segment.
pub fn parse_document_slot(key: &str) -> Result<DocumentSlot, CoreError> {
    DocumentSlot::from_key(key)
        .ok_or_else(|| CoreError::Validation(format!("Invalid document type '{key}'")))
}

/// Slots an applicant must provide for an offer of `offer_type`.
pub fn required_slots(offer_type: &str) -> Vec<DocumentSlot> {
    let mut slots = DocumentSlot::BASE.to_vec();
    if offer_type != OFFER_TYPE_CANDIDATURE {
        slots.extend(DocumentSlot::TENDER);
    }
    slots
}

/// Fail on the first required slot that `is_present` reports as missing.
pub fn check_required_documents<F>(offer_type: &str, is_present: F) -> Result<(), CoreError>
where
    F: Fn(DocumentSlot) -> bool,
{
    for slot in required_slots(offer_type) {
        if !is_present(slot) {
            let message = if slot.is_base() {
                format!("{} file is required", slot.key())
            } else {
                format!("{} file is required for this offer type", slot.key())
            };
            return Err(CoreError::Validation(message));
        }
    }
    Ok(())
}

/// Uploaded documents must be PDFs, judged by content type or file name.
pub fn is_pdf(content_type: Option<&str>, file_name: &str) -> bool {
    content_type.is_some_and(|ct| ct.eq_ignore_ascii_case("application/pdf"))
        || file_name.to_ascii_lowercase().ends_with(".pdf")
}
