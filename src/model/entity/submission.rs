use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Submission {
    id: Uuid,
    assessment_id: Uuid,
    student_id: Uuid,
    submitted_at: DateTime<Utc>,
    score: Option<f64>,
}

#[derive(Debug)]
pub struct SubmissionCreate {
    pub assessment_id: Uuid,
    pub student_id: Uuid,
    pub score: Option<f64>,
}

impl ResourceTyped for Submission {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Submission
    }
}

impl Submission {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn assessment_id(&self) -> Uuid {
        self.assessment_id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }
}

#[async_trait]
impl CrudRepository<Submission, SubmissionCreate, Uuid> for Submission {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: SubmissionCreate,
    ) -> DatabaseResult<Self> {
        let submission = sqlx::query_as(
            r#"
            INSERT INTO submissions (id, assessment_id, student_id, score)
            VALUES ($1,$2,$3,$4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.assessment_id)
        .bind(data.student_id)
        .bind(data.score)
        .fetch_one(mm.executor())
        .await?;

        Ok(submission)
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM submissions WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

impl Submission {
    pub async fn all_by_student(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        student_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM submissions WHERE student_id = $1 ORDER BY submitted_at")
                .bind(student_id)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }

    pub async fn all_by_assessments(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        assessment_ids: &[Uuid],
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM submissions WHERE assessment_id = ANY($1) ORDER BY submitted_at",
        )
        .bind(assessment_ids)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }
}
