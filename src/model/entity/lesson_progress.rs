use crate::analytics::progress::ProgressRecord;
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
pub struct LessonProgress {
    id: Uuid,
    enrollment_id: Uuid,
    lesson_id: Uuid,
    completed: bool,
    time_spent: i32,
    completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct LessonProgressCreate {
    pub enrollment_id: Uuid,
    pub lesson_id: Uuid,
    pub completed: bool,
    pub time_spent: i32,
    pub completed_at: Option<DateTime<Utc>>,
}

impl LessonProgressCreate {
    pub fn completed(enrollment_id: Uuid, lesson_id: Uuid, time_spent: i32) -> Self {
        Self {
            enrollment_id,
            lesson_id,
            completed: true,
            time_spent,
            completed_at: Some(Utc::now()),
        }
    }
}

impl ResourceTyped for LessonProgress {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::LessonProgress
    }
}

impl LessonProgress {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn enrollment_id(&self) -> Uuid {
        self.enrollment_id
    }

    pub fn lesson_id(&self) -> Uuid {
        self.lesson_id
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn time_spent(&self) -> i32 {
        self.time_spent
    }
}

#[async_trait]
impl CrudRepository<LessonProgress, LessonProgressCreate, Uuid> for LessonProgress {
    /// Upserts on `(enrollment_id, lesson_id)`, there is never more than one row per pair.
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: LessonProgressCreate,
    ) -> DatabaseResult<Self> {
        let progress = sqlx::query_as(
            r#"
            INSERT INTO lesson_progress (id, enrollment_id, lesson_id, completed, time_spent, completed_at)
            VALUES ($1,$2,$3,$4,$5,$6)
            ON CONFLICT (enrollment_id, lesson_id) DO UPDATE SET
                completed = EXCLUDED.completed,
                time_spent = EXCLUDED.time_spent,
                completed_at = EXCLUDED.completed_at
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.enrollment_id)
        .bind(data.lesson_id)
        .bind(data.completed)
        .bind(data.time_spent)
        .bind(data.completed_at)
        .fetch_one(mm.executor())
        .await?;

        Ok(progress)
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM lesson_progress WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

// Utils

#[derive(Debug, sqlx::FromRow)]
pub struct EnrollmentProgressRow {
    pub enrollment_id: Uuid,
    #[sqlx(flatten)]
    pub record: ProgressRecord,
}

impl EnrollmentProgressRow {
    pub async fn fetch_by_enrollments<'e, E: PgExecutor<'e>>(
        executor: E,
        enrollment_ids: &[Uuid],
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT enrollment_id, lesson_id, completed, time_spent, completed_at
            FROM lesson_progress
            WHERE enrollment_id = ANY($1)
            "#,
        )
        .bind(enrollment_ids)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }
}
