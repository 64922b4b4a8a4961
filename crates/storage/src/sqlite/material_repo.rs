use study_core::model::{CourseId, Material};

use super::SqliteRepository;
use super::mapping::{conn, id_to_i64, map_material_row, map_write_error, material_id_from_i64};
use crate::repository::{MaterialRepository, NewMaterialRecord, StorageError};

#[async_trait::async_trait]
impl MaterialRepository for SqliteRepository {
    async fn insert_material(
        &self,
        material: NewMaterialRecord,
    ) -> Result<Material, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO materials (course_id, title, raw_text, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(id_to_i64("course_id", material.course_id.value())?)
        .bind(material.title.as_deref())
        .bind(&material.raw_text)
        .bind(material.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        let id = material_id_from_i64(res.last_insert_rowid())?;
        Ok(material.assign_id(id))
    }

    async fn list_materials(&self, course_id: CourseId) -> Result<Vec<Material>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, course_id, title, raw_text, created_at
            FROM materials
            WHERE course_id = ?1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(id_to_i64("course_id", course_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_material_row).collect()
    }
}
