use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::model::ids::CourseId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course name cannot be empty")]
    EmptyName,
}

/// A course the user is studying for, optionally with an exam date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    name: String,
    exam_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl Course {
    /// Creates a course. The name is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyName` if the name is blank.
    pub fn new(
        id: CourseId,
        name: impl Into<String>,
        exam_date: Option<NaiveDate>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CourseError> {
        let name = normalize_name(name.into())?;
        Ok(Self {
            id,
            name,
            exam_date,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn exam_date(&self) -> Option<NaiveDate> {
        self.exam_date
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whole days from `today` until the exam; negative once it has passed.
    #[must_use]
    pub fn days_until_exam(&self, today: NaiveDate) -> Option<i64> {
        self.exam_date
            .map(|date| date.signed_duration_since(today).num_days())
    }
}

/// Trims a course name, rejecting blank input.
///
/// # Errors
///
/// Returns `CourseError::EmptyName` if nothing is left after trimming.
pub fn normalize_name(name: String) -> Result<String, CourseError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CourseError::EmptyName);
    }
    if trimmed.len() == name.len() {
        Ok(name)
    } else {
        Ok(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn blank_name_is_rejected() {
        let err = Course::new(CourseId::new(1), "   ", None, fixed_now()).unwrap_err();
        assert_eq!(err, CourseError::EmptyName);
    }

    #[test]
    fn name_is_trimmed() {
        let course = Course::new(CourseId::new(1), "  ECON 101 ", None, fixed_now()).unwrap();
        assert_eq!(course.name(), "ECON 101");
    }

    #[test]
    fn days_until_exam_counts_calendar_days() {
        let exam = NaiveDate::from_ymd_opt(2023, 11, 20).unwrap();
        let course = Course::new(CourseId::new(1), "Micro", Some(exam), fixed_now()).unwrap();
        let today = NaiveDate::from_ymd_opt(2023, 11, 14).unwrap();
        assert_eq!(course.days_until_exam(today), Some(6));
        assert_eq!(
            course.days_until_exam(NaiveDate::from_ymd_opt(2023, 11, 21).unwrap()),
            Some(-1)
        );
    }

    #[test]
    fn no_exam_date_means_no_countdown() {
        let course = Course::new(CourseId::new(1), "Macro", None, fixed_now()).unwrap();
        assert_eq!(course.days_until_exam(fixed_now().date_naive()), None);
    }
}
