use crate::analytics::SubjectCode;
use crate::analytics::pathway::RequiredSubject;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UniversityGoal {
    id: Uuid,
    student_id: Uuid,
    university: String,
    degree: String,
    discipline: String,
    required_atar: f64,
}

#[derive(Debug)]
pub struct UniversityGoalCreate {
    pub student_id: Uuid,
    pub university: String,
    pub degree: String,
    pub discipline: String,
    pub required_atar: f64,
}

impl ResourceTyped for UniversityGoal {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::UniversityGoal
    }
}

impl UniversityGoal {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn university(&self) -> &str {
        &self.university
    }

    pub fn degree(&self) -> &str {
        &self.degree
    }

    pub fn discipline(&self) -> &str {
        &self.discipline
    }

    pub fn required_atar(&self) -> f64 {
        self.required_atar
    }
}

#[async_trait]
impl CrudRepository<UniversityGoal, UniversityGoalCreate, Uuid> for UniversityGoal {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: UniversityGoalCreate,
    ) -> DatabaseResult<Self> {
        let goal = sqlx::query_as(
            r#"
            INSERT INTO university_goals (id, student_id, university, degree, discipline, required_atar)
            VALUES ($1,$2,$3,$4,$5,$6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.student_id)
        .bind(&data.university)
        .bind(&data.degree)
        .bind(&data.discipline)
        .bind(data.required_atar)
        .fetch_one(mm.executor())
        .await?;

        Ok(goal)
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM university_goals WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

impl UniversityGoal {
    pub async fn find_by_student<'e, E: PgExecutor<'e>>(
        executor: E,
        student_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM university_goals WHERE student_id = $1")
            .bind(student_id)
            .fetch_optional(executor)
            .await?;
        Ok(result)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UniversitySubject {
    id: Uuid,
    goal_id: Uuid,
    subject_code: String,
    subject_name: String,
    is_prerequisite: bool,
    recommended_mark: f64,
    order_index: i32,
}

/// The subject name is derived from the code.
#[derive(Debug)]
pub struct UniversitySubjectCreate {
    pub goal_id: Uuid,
    pub subject: SubjectCode,
    pub is_prerequisite: bool,
    pub recommended_mark: f64,
    pub order_index: i32,
}

impl ResourceTyped for UniversitySubject {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::UniversitySubject
    }
}

impl UniversitySubject {
    pub fn subject_code(&self) -> &str {
        &self.subject_code
    }

    pub fn is_prerequisite(&self) -> bool {
        self.is_prerequisite
    }
}

#[async_trait]
impl CrudRepository<UniversitySubject, UniversitySubjectCreate, Uuid> for UniversitySubject {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: UniversitySubjectCreate,
    ) -> DatabaseResult<Self> {
        let subject = sqlx::query_as(
            r#"
            INSERT INTO university_subjects
                (id, goal_id, subject_code, subject_name, is_prerequisite, recommended_mark, order_index)
            VALUES ($1,$2,$3,$4,$5,$6,$7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.goal_id)
        .bind(data.subject.as_str())
        .bind(data.subject.display_name())
        .bind(data.is_prerequisite)
        .bind(data.recommended_mark)
        .bind(data.order_index)
        .fetch_one(mm.executor())
        .await?;

        Ok(subject)
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM university_subjects WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

impl UniversitySubject {
    /// Required subjects of a goal in goal order.
    pub async fn required_by_goal<'e, E: PgExecutor<'e>>(
        executor: E,
        goal_id: Uuid,
    ) -> DatabaseResult<Vec<RequiredSubject>> {
        let rows = sqlx::query_as(
            r#"
            SELECT subject_code, subject_name, is_prerequisite, recommended_mark
            FROM university_subjects
            WHERE goal_id = $1
            ORDER BY order_index, id
            "#,
        )
        .bind(goal_id)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }
}
