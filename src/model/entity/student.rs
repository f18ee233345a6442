use crate::analytics::YearLevel;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct StudentEntity {
    id: Uuid,
    user_id: Uuid,
    year_level: String,
    atar: Option<f64>,
}

#[derive(Debug)]
pub struct StudentCreate {
    pub user_id: Uuid,
    pub year_level: YearLevel,
    pub atar: Option<f64>,
}

impl ResourceTyped for StudentEntity {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Student
    }
}

impl StudentEntity {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn year_level(&self) -> &str {
        &self.year_level
    }

    pub fn atar(&self) -> Option<f64> {
        self.atar
    }
}

#[async_trait]
impl CrudRepository<StudentEntity, StudentCreate, Uuid> for StudentEntity {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: StudentCreate,
    ) -> DatabaseResult<Self> {
        let student = sqlx::query_as(
            "INSERT INTO students (id, user_id, year_level, atar) VALUES ($1,$2,$3,$4) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.year_level.as_str())
        .bind(data.atar)
        .fetch_one(mm.executor())
        .await?;

        Ok(student)
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

impl StudentEntity {
    pub async fn find_by_user_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM students WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

// Utils

/// A student as seen from a course roster.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct EnrolledStudentRow {
    pub student_id: Uuid,
    pub enrollment_id: Uuid,
    pub name: String,
    pub email: String,
    pub year_level: String,
    pub atar: Option<f64>,
}

impl EnrolledStudentRow {
    pub async fn all_by_course(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        course_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                s.id AS student_id,
                e.id AS enrollment_id,
                u.name,
                u.email,
                s.year_level,
                s.atar
            FROM enrollments e
            JOIN students s ON s.id = e.student_id
            JOIN users u ON u.id = s.user_id
            WHERE e.course_id = $1
            ORDER BY u.name, s.id
            "#,
        )
        .bind(course_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
