use crate::analytics::{CourseInfo, SubjectCode, YearLevel};
use crate::model::access::HasOwner;
use crate::model::repo::{PaginatableRepository, ResourceTyped};
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Course {
    id: Uuid,
    code: String,
    name: String,
    description: String,
    year_level: String,
    subject: String,
    units: i32,
    teacher_id: Uuid,
}

/// Subject and year level are typed so only known codes reach the table.
#[derive(Debug)]
pub struct CourseCreate {
    pub code: String,
    pub name: String,
    pub description: String,
    pub year_level: YearLevel,
    pub subject: SubjectCode,
    pub units: i32,
    pub teacher_id: Uuid,
}

impl ResourceTyped for Course {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Course
    }
}

impl Course {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn year_level(&self) -> &str {
        &self.year_level
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn teacher_id(&self) -> Uuid {
        self.teacher_id
    }
}

#[async_trait]
impl CrudRepository<Course, CourseCreate, Uuid> for Course {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: CourseCreate,
    ) -> DatabaseResult<Self> {
        let course = sqlx::query_as(
            r#"
            INSERT INTO courses (id, code, name, description, year_level, subject, units, teacher_id)
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.code)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.year_level.as_str())
        .bind(data.subject.as_str())
        .bind(data.units)
        .bind(data.teacher_id)
        .fetch_one(mm.executor())
        .await?;

        Ok(course)
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

impl Course {
    pub async fn all_by_teacher(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        teacher_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE teacher_id = $1 ORDER BY code")
            .bind(teacher_id)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }
}

#[async_trait]
impl HasOwner for Course {
    type OwnerId = Uuid;

    async fn get_owner_id(
        &self,
        _mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Self::OwnerId> {
        Ok(self.teacher_id)
    }
}

// Catalogue

const CATALOGUE_SELECT: &str = r#"
    SELECT
        c.id,
        c.code,
        c.name,
        c.description,
        c.year_level,
        c.subject,
        c.units,
        c.teacher_id,
        u.name AS teacher_name
    FROM courses c
    JOIN teachers t ON t.id = c.teacher_id
    JOIN users u ON u.id = t.user_id
"#;

impl Course {
    /// Catalogue view of one course.
    pub async fn info_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<CourseInfo>> {
        let query = format!("{CATALOGUE_SELECT} WHERE c.id = $1");
        let result = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

#[async_trait]
impl PaginatableRepository<CourseInfo> for Course {
    async fn list(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<CourseInfo>> {
        let query = format!("{CATALOGUE_SELECT} ORDER BY c.code LIMIT $1 OFFSET $2");
        let result = sqlx::query_as(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

// Utils

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct TeacherCourseRow {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub year_level: String,
    pub subject: String,
    pub units: i32,
    pub enrollment_count: i64,
}

impl TeacherCourseRow {
    pub async fn all_by_teacher(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        teacher_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                c.id,
                c.code,
                c.name,
                c.year_level,
                c.subject,
                c.units,
                COUNT(e.id) AS enrollment_count
            FROM courses c
            LEFT JOIN enrollments e ON e.course_id = c.id
            WHERE c.teacher_id = $1
            GROUP BY c.id
            ORDER BY c.code
            "#,
        )
        .bind(teacher_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
