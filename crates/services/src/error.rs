//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use study_core::model::{CourseError, MaterialError};
use study_core::quiz::{ParseTopicError, SessionError};

/// Errors emitted by `QuizGenerationService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizGenerationError {
    #[error("missing text")]
    MissingText,
    #[error("quiz generation is not configured (set STUDY_AI_API_KEY)")]
    Disabled,
    #[error("quiz generation failed with status {status}: {message}")]
    HttpStatus {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("quiz generation returned a non-JSON body")]
    InvalidResponse { raw: String },
    #[error("no quiz content returned")]
    EmptyResponse,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `CourseService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseServiceError {
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `MaterialService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MaterialServiceError {
    #[error(transparent)]
    Material(#[from] MaterialError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failure reported by a `TextExtractor` implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("could not read document: {0}")]
pub struct ExtractError(pub String);

/// Errors emitted while importing a document into a material draft.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImportError {
    #[error("please choose a PDF file (got {content_type})")]
    NotPdf { content_type: String },
    #[error("this PDF has no selectable text (likely scanned)")]
    NoSelectableText,
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Errors emitted by `QuizController`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizControllerError {
    #[error("no quiz session is active")]
    NoSession,
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted while loading `QuizSettings`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("{var} must be a whole number (got {raw:?})")]
    InvalidNumber { var: &'static str, raw: String },
    #[error("question count {0} is not offered (choose 5, 8, 10, 12 or 15)")]
    UnsupportedCount(usize),
    #[error("exam length {0} minutes is not offered (choose 5, 10, 15, 20, 30, 45 or 60)")]
    UnsupportedDuration(u32),
    #[error(transparent)]
    Topic(#[from] ParseTopicError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
