#![forbid(unsafe_code)]

pub mod app_services;
pub mod course_service;
pub mod error;
pub mod material_service;
pub mod quiz;
pub mod quiz_generation_service;

pub use study_core::Clock;

pub use app_services::AppServices;
pub use course_service::CourseService;
pub use error::{
    AppServicesError, CourseServiceError, ExtractError, ImportError, MaterialServiceError,
    QuizControllerError, QuizGenerationError, SettingsError,
};
pub use material_service::{MaterialService, PdfTextExtractor, TextExtractor, import_document};
pub use quiz::{ExamClock, QuizController, QuizSettings, SessionId, SessionTicket};
pub use quiz_generation_service::{GeneratedQuiz, QuizGenerationConfig, QuizGenerationService};
