use study_core::model::{Course, CourseId};

use super::SqliteRepository;
use super::mapping::{conn, course_id_from_i64, id_to_i64, map_course_row, map_write_error};
use crate::repository::{CourseRepository, NewCourseRecord, StorageError};

#[async_trait::async_trait]
impl CourseRepository for SqliteRepository {
    async fn insert_course(&self, course: NewCourseRecord) -> Result<Course, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO courses (name, exam_date, created_at)
            VALUES (?1, ?2, ?3)
            ",
        )
        .bind(&course.name)
        .bind(course.exam_date)
        .bind(course.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        let id = course_id_from_i64(res.last_insert_rowid())?;
        Course::new(id, course.name, course.exam_date, course.created_at)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, name, exam_date, created_at
            FROM courses
            WHERE id = ?1
            ",
        )
        .bind(id_to_i64("course_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_course_row).transpose()
    }

    async fn list_courses(&self, limit: u32) -> Result<Vec<Course>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, exam_date, created_at
            FROM courses
            ORDER BY created_at DESC, id DESC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_course_row).collect()
    }
}
