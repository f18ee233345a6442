use crate::analytics::CourseInfo;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Enrollment {
    id: Uuid,
    student_id: Uuid,
    course_id: Uuid,
    enrolled_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct EnrollmentCreate {
    pub student_id: Uuid,
    pub course_id: Uuid,
}

impl ResourceTyped for Enrollment {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Enrollment
    }
}

impl Enrollment {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }
}

#[async_trait]
impl CrudRepository<Enrollment, EnrollmentCreate, Uuid> for Enrollment {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: EnrollmentCreate,
    ) -> DatabaseResult<Self> {
        let enrollment = sqlx::query_as(
            "INSERT INTO enrollments (id, student_id, course_id) VALUES ($1,$2,$3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.student_id)
        .bind(data.course_id)
        .fetch_one(mm.executor())
        .await?;

        Ok(enrollment)
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM enrollments WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

impl Enrollment {
    /// The student's enrollment in the course that owns `lesson_id`, if any.
    pub async fn find_by_lesson(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        student_id: Uuid,
        lesson_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(
            r#"
            SELECT e.*
            FROM lessons l
            JOIN modules m ON m.id = l.module_id
            JOIN enrollments e ON e.course_id = m.course_id
            WHERE l.id = $1 AND e.student_id = $2
            "#,
        )
        .bind(lesson_id)
        .bind(student_id)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }
}

// Utils

#[derive(Debug, sqlx::FromRow)]
pub struct EnrollmentCourseRow {
    pub enrollment_id: Uuid,
    pub student_id: Uuid,
    #[sqlx(flatten)]
    pub course: CourseInfo,
}

impl EnrollmentCourseRow {
    /// In enrollment order.
    pub async fn fetch_by_student<'e, E: PgExecutor<'e>>(
        executor: E,
        student_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                e.id AS enrollment_id,
                e.student_id,
                c.id,
                c.code,
                c.name,
                c.description,
                c.year_level,
                c.subject,
                c.units,
                c.teacher_id,
                u.name AS teacher_name
            FROM enrollments e
            JOIN courses c ON c.id = e.course_id
            JOIN teachers t ON t.id = c.teacher_id
            JOIN users u ON u.id = t.user_id
            WHERE e.student_id = $1
            ORDER BY e.enrolled_at, e.id
            "#,
        )
        .bind(student_id)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }
    /// Every enrollment of one course, in enrollment order.
    pub async fn fetch_by_course<'e, E: PgExecutor<'e>>(
        executor: E,
        course_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                e.id AS enrollment_id,
                e.student_id,
                c.id,
                c.code,
                c.name,
                c.description,
                c.year_level,
                c.subject,
                c.units,
                c.teacher_id,
                u.name AS teacher_name
            FROM enrollments e
            JOIN courses c ON c.id = e.course_id
            JOIN teachers t ON t.id = c.teacher_id
            JOIN users u ON u.id = t.user_id
            WHERE e.course_id = $1
            ORDER BY e.enrolled_at, e.id
            "#,
        )
        .bind(course_id)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }
}
