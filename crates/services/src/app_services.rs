use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::course_service::CourseService;
use crate::error::AppServicesError;
use crate::material_service::MaterialService;
use crate::quiz_generation_service::QuizGenerationService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    courses: Arc<CourseService>,
    materials: Arc<MaterialService>,
    quiz_generation: Arc<QuizGenerationService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        tracing::debug!(db_url, "sqlite storage ready");
        Ok(Self::from_storage(&storage, clock, QuizGenerationService::from_env()))
    }

    /// Build services over an in-memory backend with quiz generation disabled.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, QuizGenerationService::new(None))
    }

    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        quiz_generation: QuizGenerationService,
    ) -> Self {
        Self {
            courses: Arc::new(CourseService::new(clock, Arc::clone(&storage.courses))),
            materials: Arc::new(MaterialService::new(clock, Arc::clone(&storage.materials))),
            quiz_generation: Arc::new(quiz_generation),
        }
    }

    #[must_use]
    pub fn courses(&self) -> Arc<CourseService> {
        Arc::clone(&self.courses)
    }

    #[must_use]
    pub fn materials(&self) -> Arc<MaterialService> {
        Arc::clone(&self.materials)
    }

    #[must_use]
    pub fn quiz_generation(&self) -> Arc<QuizGenerationService> {
        Arc::clone(&self.quiz_generation)
    }
}
