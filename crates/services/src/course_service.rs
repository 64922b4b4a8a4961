use std::sync::Arc;

use chrono::NaiveDate;
use storage::repository::{CourseRepository, NewCourseRecord};
use study_core::model::{Course, CourseId};

use crate::Clock;
use crate::error::CourseServiceError;

/// Upper bound for course listings; the list is meant to fit on one screen.
pub const COURSE_LIST_LIMIT: u32 = 200;

/// Orchestrates course creation and lookup.
#[derive(Clone)]
pub struct CourseService {
    clock: Clock,
    courses: Arc<dyn CourseRepository>,
}

impl CourseService {
    #[must_use]
    pub fn new(clock: Clock, courses: Arc<dyn CourseRepository>) -> Self {
        Self { clock, courses }
    }

    /// Create a course stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Course` if the name is blank.
    /// Returns `CourseServiceError::Storage` if persistence fails.
    pub async fn add_course(
        &self,
        name: String,
        exam_date: Option<NaiveDate>,
    ) -> Result<Course, CourseServiceError> {
        let record = NewCourseRecord::new(name, exam_date, self.clock.now())?;
        let course = self.courses.insert_course(record).await?;
        tracing::info!(course_id = %course.id(), name = course.name(), "course added");
        Ok(course)
    }

    /// Courses ordered newest first.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if repository access fails.
    pub async fn list_courses(&self) -> Result<Vec<Course>, CourseServiceError> {
        Ok(self.courses.list_courses(COURSE_LIST_LIMIT).await?)
    }

    /// Fetch a course by ID.
    ///
    /// Returns `Ok(None)` when the course does not exist.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if repository access fails.
    pub async fn get_course(&self, id: CourseId) -> Result<Option<Course>, CourseServiceError> {
        Ok(self.courses.get_course(id).await?)
    }

    /// Days left until the course's exam, relative to the service clock.
    #[must_use]
    pub fn days_until_exam(&self, course: &Course) -> Option<i64> {
        course.days_until_exam(self.clock.today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use storage::repository::InMemoryRepository;
    use study_core::model::CourseError;
    use study_core::time::fixed_now;

    fn service(clock: Clock) -> CourseService {
        CourseService::new(clock, Arc::new(InMemoryRepository::new()))
    }

    #[tokio::test]
    async fn add_course_trims_and_stamps_creation_time() {
        let svc = service(Clock::fixed(fixed_now()));
        let course = svc
            .add_course("  Intro Micro  ".into(), None)
            .await
            .unwrap();

        assert_eq!(course.name(), "Intro Micro");
        assert_eq!(course.created_at(), fixed_now());
        assert_eq!(svc.get_course(course.id()).await.unwrap(), Some(course));
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let svc = service(Clock::fixed(fixed_now()));
        let err = svc.add_course("   ".into(), None).await.unwrap_err();
        assert!(matches!(
            err,
            CourseServiceError::Course(CourseError::EmptyName)
        ));
        assert!(svc.list_courses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let repo: Arc<dyn CourseRepository> = Arc::new(InMemoryRepository::new());
        let early = CourseService::new(Clock::fixed(fixed_now()), Arc::clone(&repo));
        let late = CourseService::new(
            Clock::fixed(fixed_now() + Duration::days(1)),
            Arc::clone(&repo),
        );

        early.add_course("First".into(), None).await.unwrap();
        late.add_course("Second".into(), None).await.unwrap();

        let names: Vec<String> = early
            .list_courses()
            .await
            .unwrap()
            .iter()
            .map(|c| c.name().to_owned())
            .collect();
        assert_eq!(names, ["Second", "First"]);
    }

    #[tokio::test]
    async fn days_until_exam_uses_service_clock() {
        let svc = service(Clock::fixed(fixed_now()));
        let exam = fixed_now().date_naive() + Duration::days(12);
        let course = svc.add_course("Macro".into(), Some(exam)).await.unwrap();
        assert_eq!(svc.days_until_exam(&course), Some(12));
    }
}
