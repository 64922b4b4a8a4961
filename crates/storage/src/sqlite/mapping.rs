use chrono::{DateTime, NaiveDate, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use study_core::model::{Course, CourseId, Material, MaterialId};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn id_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn course_id_from_i64(v: i64) -> Result<CourseId, StorageError> {
    Ok(CourseId::new(i64_to_u64("course_id", v)?))
}

pub(crate) fn material_id_from_i64(v: i64) -> Result<MaterialId, StorageError> {
    Ok(MaterialId::new(i64_to_u64("material_id", v)?))
}

/// Constraint violations become repository errors; everything else is a connection failure.
pub(crate) fn map_write_error(e: sqlx::Error) -> StorageError {
    match e.as_database_error().map(|db| db.kind()) {
        Some(sqlx::error::ErrorKind::ForeignKeyViolation) => StorageError::NotFound,
        Some(sqlx::error::ErrorKind::UniqueViolation) => StorageError::Conflict,
        _ => conn(e),
    }
}

pub(crate) fn map_course_row(row: &SqliteRow) -> Result<Course, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    let name: String = row.try_get("name").map_err(ser)?;
    let exam_date: Option<NaiveDate> = row.try_get("exam_date").map_err(ser)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(ser)?;

    Course::new(course_id_from_i64(id)?, name, exam_date, created_at).map_err(ser)
}

pub(crate) fn map_material_row(row: &SqliteRow) -> Result<Material, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    let course_id: i64 = row.try_get("course_id").map_err(ser)?;

    Ok(Material {
        id: material_id_from_i64(id)?,
        course_id: course_id_from_i64(course_id)?,
        title: row.try_get("title").map_err(ser)?,
        raw_text: row.try_get("raw_text").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}
