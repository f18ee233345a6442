use std::fmt;

use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentKind {
    Quiz,
    Assignment,
    Exam,
}

impl AssessmentKind {
    pub const ALL: [AssessmentKind; 3] = [Self::Quiz, Self::Assignment, Self::Exam];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quiz => "QUIZ",
            Self::Assignment => "ASSIGNMENT",
            Self::Exam => "EXAM",
        }
    }
}

impl fmt::Display for AssessmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Assessment {
    id: Uuid,
    course_id: Uuid,
    teacher_id: Uuid,
    title: String,
    description: String,
    kind: String,
    total_marks: i32,
    weight: f64,
    due_date: DateTime<Utc>,
}

#[derive(Debug)]
pub struct AssessmentCreate {
    pub course_id: Uuid,
    pub teacher_id: Uuid,
    pub title: String,
    pub description: String,
    pub kind: AssessmentKind,
    pub total_marks: i32,
    pub weight: f64,
    pub due_date: DateTime<Utc>,
}

impl ResourceTyped for Assessment {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Assessment
    }
}

impl Assessment {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }
}

#[async_trait]
impl CrudRepository<Assessment, AssessmentCreate, Uuid> for Assessment {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: AssessmentCreate,
    ) -> DatabaseResult<Self> {
        let assessment = sqlx::query_as(
            r#"
            INSERT INTO assessments
                (id, course_id, teacher_id, title, description, kind, total_marks, weight, due_date)
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.course_id)
        .bind(data.teacher_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.kind.as_str())
        .bind(data.total_marks)
        .bind(data.weight)
        .bind(data.due_date)
        .fetch_one(mm.executor())
        .await?;

        Ok(assessment)
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM assessments WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

impl Assessment {
    pub async fn all_by_teacher(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        teacher_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM assessments WHERE teacher_id = $1 ORDER BY due_date, id")
                .bind(teacher_id)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }

    /// Assessments of every course the student is enrolled in.
    pub async fn all_by_student(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        student_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            r#"
            SELECT a.*
            FROM assessments a
            JOIN enrollments e ON e.course_id = a.course_id
            WHERE e.student_id = $1
            ORDER BY a.due_date, a.id
            "#,
        )
        .bind(student_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    /// The first `limit` assessments of a course by due date, past ones included.
    pub async fn first_by_course(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        course_id: Uuid,
        limit: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM assessments WHERE course_id = $1 ORDER BY due_date, id LIMIT $2",
        )
        .bind(course_id)
        .bind(limit)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }
}
