use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use study_core::model::{
    Course, CourseError, CourseId, Material, MaterialId, ValidatedMaterial, normalize_name,
};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Insert shape for a course; the id is assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourseRecord {
    pub name: String,
    pub exam_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl NewCourseRecord {
    /// # Errors
    ///
    /// Returns `CourseError::EmptyName` if the name is blank.
    pub fn new(
        name: impl Into<String>,
        exam_date: Option<NaiveDate>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CourseError> {
        Ok(Self {
            name: normalize_name(name.into())?,
            exam_date,
            created_at,
        })
    }

    fn assign_id(self, id: CourseId) -> Result<Course, StorageError> {
        Course::new(id, self.name, self.exam_date, self.created_at)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

/// Insert shape for a material; the id is assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMaterialRecord {
    pub course_id: CourseId,
    pub title: Option<String>,
    pub raw_text: String,
    pub created_at: DateTime<Utc>,
}

impl NewMaterialRecord {
    #[must_use]
    pub fn from_validated(
        course_id: CourseId,
        material: ValidatedMaterial,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            course_id,
            title: material.title,
            raw_text: material.raw_text,
            created_at,
        }
    }

    #[must_use]
    pub fn assign_id(self, id: MaterialId) -> Material {
        Material {
            id,
            course_id: self.course_id,
            title: self.title,
            raw_text: self.raw_text,
            created_at: self.created_at,
        }
    }
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Insert a new course and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored.
    async fn insert_course(&self, course: NewCourseRecord) -> Result<Course, StorageError>;

    /// Fetch a course by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StorageError>;

    /// List courses, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_courses(&self, limit: u32) -> Result<Vec<Course>, StorageError>;
}

#[async_trait]
pub trait MaterialRepository: Send + Sync {
    /// Insert a material for an existing course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the course does not exist.
    async fn insert_material(&self, material: NewMaterialRecord)
    -> Result<Material, StorageError>;

    /// All materials of a course, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_materials(&self, course_id: CourseId) -> Result<Vec<Material>, StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    courses: Arc<Mutex<HashMap<CourseId, Course>>>,
    materials: Arc<Mutex<Vec<Material>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn next_id(len: usize) -> Result<u64, StorageError> {
    u64::try_from(len + 1).map_err(|_| StorageError::Serialization("id overflow".into()))
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, u64)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn insert_course(&self, course: NewCourseRecord) -> Result<Course, StorageError> {
        let mut guard = self.courses.lock().map_err(poisoned)?;
        let id = CourseId::new(next_id(guard.len())?);
        let course = course.assign_id(id)?;
        guard.insert(id, course.clone());
        Ok(course)
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StorageError> {
        let guard = self.courses.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_courses(&self, limit: u32) -> Result<Vec<Course>, StorageError> {
        let guard = self.courses.lock().map_err(poisoned)?;
        let mut courses: Vec<Course> = guard.values().cloned().collect();
        newest_first(&mut courses, |c| (c.created_at(), c.id().value()));
        courses.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(courses)
    }
}

#[async_trait]
impl MaterialRepository for InMemoryRepository {
    async fn insert_material(
        &self,
        material: NewMaterialRecord,
    ) -> Result<Material, StorageError> {
        if !self
            .courses
            .lock()
            .map_err(poisoned)?
            .contains_key(&material.course_id)
        {
            return Err(StorageError::NotFound);
        }

        let mut guard = self.materials.lock().map_err(poisoned)?;
        let material = material.assign_id(MaterialId::new(next_id(guard.len())?));
        guard.push(material.clone());
        Ok(material)
    }

    async fn list_materials(&self, course_id: CourseId) -> Result<Vec<Material>, StorageError> {
        let guard = self.materials.lock().map_err(poisoned)?;
        let mut found: Vec<Material> = guard
            .iter()
            .filter(|m| m.course_id == course_id)
            .cloned()
            .collect();
        newest_first(&mut found, |m| (m.created_at, m.id.value()));
        Ok(found)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub courses: Arc<dyn CourseRepository>,
    pub materials: Arc<dyn MaterialRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let courses: Arc<dyn CourseRepository> = Arc::new(repo.clone());
        let materials: Arc<dyn MaterialRepository> = Arc::new(repo);
        Self { courses, materials }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use study_core::model::MaterialDraft;
    use study_core::time::fixed_now;

    fn material(course_id: CourseId, text: &str, at: DateTime<Utc>) -> NewMaterialRecord {
        let validated = MaterialDraft::new("", text).validate().unwrap();
        NewMaterialRecord::from_validated(course_id, validated, at)
    }

    #[tokio::test]
    async fn courses_get_sequential_ids_and_list_newest_first() {
        let repo = InMemoryRepository::new();
        let older = repo
            .insert_course(NewCourseRecord::new("Micro", None, fixed_now()).unwrap())
            .await
            .unwrap();
        let newer = repo
            .insert_course(
                NewCourseRecord::new("Macro", None, fixed_now() + Duration::hours(1)).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(older.id(), CourseId::new(1));
        assert_eq!(newer.id(), CourseId::new(2));

        let listed = repo.list_courses(10).await.unwrap();
        assert_eq!(listed, vec![newer.clone(), older]);
        assert_eq!(repo.list_courses(1).await.unwrap(), vec![newer]);
    }

    #[tokio::test]
    async fn blank_course_name_never_reaches_storage() {
        let err = NewCourseRecord::new("  ", None, fixed_now()).unwrap_err();
        assert_eq!(err, CourseError::EmptyName);
    }

    #[tokio::test]
    async fn materials_are_scoped_to_course() {
        let repo = InMemoryRepository::new();
        let a = repo
            .insert_course(NewCourseRecord::new("A", None, fixed_now()).unwrap())
            .await
            .unwrap();
        let b = repo
            .insert_course(NewCourseRecord::new("B", None, fixed_now()).unwrap())
            .await
            .unwrap();

        repo.insert_material(material(a.id(), "first", fixed_now()))
            .await
            .unwrap();
        repo.insert_material(material(b.id(), "other", fixed_now()))
            .await
            .unwrap();
        repo.insert_material(material(a.id(), "second", fixed_now() + Duration::minutes(5)))
            .await
            .unwrap();

        let listed = repo.list_materials(a.id()).await.unwrap();
        let texts: Vec<_> = listed.iter().map(|m| m.raw_text.as_str()).collect();
        assert_eq!(texts, ["second", "first"]);
    }

    #[tokio::test]
    async fn material_for_missing_course_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo
            .insert_material(material(CourseId::new(9), "orphan", fixed_now()))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }
}
