use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct StudyPlan {
    id: Uuid,
    student_id: Uuid,
    title: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct StudyPlanCreate {
    pub student_id: Uuid,
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl ResourceTyped for StudyPlan {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::StudyPlan
    }
}

impl StudyPlan {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

#[async_trait]
impl CrudRepository<StudyPlan, StudyPlanCreate, Uuid> for StudyPlan {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: StudyPlanCreate,
    ) -> DatabaseResult<Self> {
        let plan = sqlx::query_as(
            r#"
            INSERT INTO study_plans (id, student_id, title, start_date, end_date)
            VALUES ($1,$2,$3,$4,$5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.student_id)
        .bind(&data.title)
        .bind(data.start_date)
        .bind(data.end_date)
        .fetch_one(mm.executor())
        .await?;

        Ok(plan)
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM study_plans WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

impl StudyPlan {
    /// Most recently created plan of the student.
    pub async fn latest_by_student(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        student_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM study_plans WHERE student_id = $1 ORDER BY created_at DESC, id LIMIT 1",
        )
        .bind(student_id)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct StudySession {
    id: Uuid,
    study_plan_id: Uuid,
    title: String,
    subject: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    completed: bool,
    notes: Option<String>,
}

#[derive(Debug)]
pub struct StudySessionCreate {
    pub study_plan_id: Uuid,
    pub title: String,
    pub subject: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub completed: bool,
    pub notes: Option<String>,
}

impl ResourceTyped for StudySession {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::StudySession
    }
}

impl StudySession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn completed(&self) -> bool {
        self.completed
    }
}

#[async_trait]
impl CrudRepository<StudySession, StudySessionCreate, Uuid> for StudySession {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: StudySessionCreate,
    ) -> DatabaseResult<Self> {
        let session = sqlx::query_as(
            r#"
            INSERT INTO study_sessions
                (id, study_plan_id, title, subject, start_time, end_time, completed, notes)
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.study_plan_id)
        .bind(&data.title)
        .bind(&data.subject)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.completed)
        .bind(&data.notes)
        .fetch_one(mm.executor())
        .await?;

        Ok(session)
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM study_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

impl StudySession {
    pub async fn all_by_plan(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        plan_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM study_sessions WHERE study_plan_id = $1 ORDER BY start_time, id",
        )
        .bind(plan_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    /// Sessions starting at or after `now`, soonest first.
    pub async fn upcoming_by_plan(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        plan_id: Uuid,
        now: DateTime<Utc>,
        limit: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            r#"
            SELECT * FROM study_sessions
            WHERE study_plan_id = $1 AND start_time >= $2
            ORDER BY start_time, id
            LIMIT $3
            "#,
        )
        .bind(plan_id)
        .bind(now)
        .bind(limit)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }
}
