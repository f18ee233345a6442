use crate::analytics::SubjectCode;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct TeacherEntity {
    id: Uuid,
    user_id: Uuid,
    department: String,
    specialties: Vec<String>,
}

#[derive(Debug)]
pub struct TeacherCreate {
    pub user_id: Uuid,
    pub department: String,
    pub specialties: Vec<SubjectCode>,
}

impl ResourceTyped for TeacherEntity {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Teacher
    }
}

impl TeacherEntity {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn specialties(&self) -> &[String] {
        &self.specialties
    }
}

#[async_trait]
impl CrudRepository<TeacherEntity, TeacherCreate, Uuid> for TeacherEntity {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: TeacherCreate,
    ) -> DatabaseResult<Self> {
        let specialties: Vec<&str> = data.specialties.iter().map(|s| s.as_str()).collect();
        let teacher = sqlx::query_as(
            "INSERT INTO teachers (id, user_id, department, specialties) VALUES ($1,$2,$3,$4) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(&data.department)
        .bind(&specialties)
        .fetch_one(mm.executor())
        .await?;

        Ok(teacher)
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM teachers WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

impl TeacherEntity {
    pub async fn find_by_user_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM teachers WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}
