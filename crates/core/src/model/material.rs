use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{CourseId, MaterialId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MaterialError {
    #[error("material text cannot be empty")]
    EmptyText,
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Notes being composed before they are saved to a course.
///
/// Mirrors the editor state: a free-text title and a body that imports can
/// append to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialDraft {
    pub title: String,
    pub raw_text: String,
}

impl MaterialDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            raw_text: raw_text.into(),
        }
    }

    /// Appends text extracted from an imported document.
    ///
    /// The text is preceded by a `--- PDF IMPORT: <file> ---` marker. An empty
    /// title is filled from the file name with any `.pdf` suffix removed.
    pub fn append_import(&mut self, file_name: &str, extracted: &str) {
        let header = format!("\n\n--- PDF IMPORT: {file_name} ---\n");
        if self.raw_text.is_empty() {
            self.raw_text = format!("{}{extracted}", header.trim_start());
        } else {
            self.raw_text.push_str(&header);
            self.raw_text.push_str(extracted);
        }

        if self.title.is_empty() {
            self.title = strip_pdf_suffix(file_name).to_owned();
        }
    }

    /// Validates the draft for storage.
    ///
    /// # Errors
    ///
    /// Returns `MaterialError::EmptyText` if the body is blank.
    pub fn validate(&self) -> Result<ValidatedMaterial, MaterialError> {
        let raw_text = self.raw_text.trim();
        if raw_text.is_empty() {
            return Err(MaterialError::EmptyText);
        }
        let title = self.title.trim();
        Ok(ValidatedMaterial {
            title: (!title.is_empty()).then(|| title.to_owned()),
            raw_text: raw_text.to_owned(),
        })
    }
}

fn strip_pdf_suffix(file_name: &str) -> &str {
    let cut = file_name.len().saturating_sub(4);
    match file_name.get(cut..) {
        Some(ext) if ext.eq_ignore_ascii_case(".pdf") => &file_name[..cut],
        _ => file_name,
    }
}

/// Trimmed title/body ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMaterial {
    pub title: Option<String>,
    pub raw_text: String,
}

//
// ─── MATERIAL ──────────────────────────────────────────────────────────────────
//

/// A saved block of notes belonging to a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    pub id: MaterialId,
    pub course_id: CourseId,
    pub title: Option<String>,
    pub raw_text: String,
    pub created_at: DateTime<Utc>,
}

impl Material {
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }
}

/// Joins every material body with a blank line, in the given order.
#[must_use]
pub fn combined_notes(materials: &[Material]) -> String {
    materials
        .iter()
        .map(|m| m.raw_text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
