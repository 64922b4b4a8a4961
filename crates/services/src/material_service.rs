use std::sync::Arc;

use storage::repository::{MaterialRepository, NewMaterialRecord};
use study_core::model::{CourseId, Material, MaterialDraft, combined_notes};

use crate::Clock;
use crate::error::{ExtractError, ImportError, MaterialServiceError};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Pulls selectable text out of a document.
///
/// Implementations return pages joined by blank lines; whitespace-only output
/// means the document had no text layer.
pub trait TextExtractor: Send + Sync {
    /// # Errors
    ///
    /// Returns `ExtractError` if the bytes cannot be parsed.
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Text layer extraction for PDF documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError(e.to_string()))
    }
}

/// Merges a document's text into `draft`.
///
/// Only PDFs are accepted. On success the draft body gains a
/// `--- PDF IMPORT: <file> ---` section and an empty title is filled from the
/// file name. On error the draft is left untouched.
///
/// # Errors
///
/// Returns `ImportError::NotPdf` for other content types,
/// `ImportError::NoSelectableText` when extraction yields only whitespace, and
/// `ImportError::Extract` when the extractor fails.
pub fn import_document(
    draft: &mut MaterialDraft,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
    extractor: &dyn TextExtractor,
) -> Result<(), ImportError> {
    if !is_pdf(content_type) {
        return Err(ImportError::NotPdf {
            content_type: content_type.to_owned(),
        });
    }

    let text = extractor.extract_text(bytes)?;
    let cleaned = text.trim();
    if cleaned.is_empty() {
        return Err(ImportError::NoSelectableText);
    }

    draft.append_import(file_name, cleaned);
    tracing::debug!(file_name, chars = cleaned.len(), "document imported into draft");
    Ok(())
}

fn is_pdf(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
}

/// Stores and lists study materials for a course.
#[derive(Clone)]
pub struct MaterialService {
    clock: Clock,
    materials: Arc<dyn MaterialRepository>,
}

impl MaterialService {
    #[must_use]
    pub fn new(clock: Clock, materials: Arc<dyn MaterialRepository>) -> Self {
        Self { clock, materials }
    }

    /// Materials of a course, newest first.
    ///
    /// # Errors
    ///
    /// Returns `MaterialServiceError::Storage` if repository access fails.
    pub async fn list(&self, course_id: CourseId) -> Result<Vec<Material>, MaterialServiceError> {
        Ok(self.materials.list_materials(course_id).await?)
    }

    /// Validate and store a draft.
    ///
    /// # Errors
    ///
    /// Returns `MaterialServiceError::Material` if the body is blank.
    /// Returns `MaterialServiceError::Storage` if the course is missing or
    /// persistence fails.
    pub async fn add(
        &self,
        course_id: CourseId,
        draft: &MaterialDraft,
    ) -> Result<Material, MaterialServiceError> {
        let validated = draft.validate()?;
        let record = NewMaterialRecord::from_validated(course_id, validated, self.clock.now());
        let material = self.materials.insert_material(record).await?;
        tracing::info!(
            course_id = %course_id,
            material_id = %material.id,
            title = material.display_title(),
            "material saved"
        );
        Ok(material)
    }

    /// All notes of a course as one text block, newest first, separated by a
    /// blank line.
    ///
    /// # Errors
    ///
    /// Returns `MaterialServiceError::Storage` if repository access fails.
    pub async fn combined_notes(&self, course_id: CourseId) -> Result<String, MaterialServiceError> {
        let materials = self.list(course_id).await?;
        Ok(combined_notes(&materials))
    }
}
