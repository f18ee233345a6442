use crate::{
    web::{AppState, WebError, WebResult, doc::ApiDoc},
};
use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use serde::{Deserialize, Serialize};
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod assessments;
pub mod auth;
pub mod courses;
pub mod students;
pub mod teachers;
pub mod university;

const DEFAULT_PAGE_LIMIT: i64 = 20;
const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// 1 to 100, defaults to 20
    limit: Option<i64>,
    /// defaults to 0
    offset: Option<i64>,
}

impl PaginationQuery {
    pub fn validated(&self) -> WebResult<(i64, i64)> {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        let offset = self.offset.unwrap_or(0);

        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(WebError::request_invalid(
                "limit",
                format!("must be between 1 and {MAX_PAGE_LIMIT}"),
            ));
        }
        if offset < 0 {
            return Err(WebError::request_invalid("offset", "must not be negative"));
        }

        Ok((limit, offset))
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    description = "Liveness probe",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
    tag = "health"
)]
async fn health_handler() -> impl IntoResponse {
    let body = HealthResponse {
        status: String::from("OK"),
        timestamp: chrono::Utc::now(),
    };
    (StatusCode::OK, Json(body))
}

pub fn build_app<S: Send + Sync + Clone + 'static>(state: AppState) -> Router<S> {
    let docs = state.config().app().docs();
    let mut router = Router::new()
        .route("/api/v1/health", get(health_handler))
        .nest("/api/v1/auth/", auth::routes(state.clone()))
        .nest("/api/v1/students/", students::routes(state.clone()))
        .nest("/api/v1/teachers/", teachers::routes(state.clone()))
        .nest("/api/v1/courses/", courses::routes(state.clone()))
        .nest("/api/v1/assessments/", assessments::routes(state.clone()))
        .nest("/api/v1/university/", university::routes(state.clone()))
        .layer(CookieManagerLayer::default())
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    if docs {
        let openapi = ApiDoc::openapi();

        router = router.merge(SwaggerUi::new("/api/v1/docs").url("/api-doc/openapi.json", openapi));
    }

    router
}

#[cfg(test)]
mod test {
    use super::*;

    fn query(limit: Option<i64>, offset: Option<i64>) -> PaginationQuery {
        PaginationQuery { limit, offset }
    }

    #[test]
    fn test_pagination_defaults() {
        assert_eq!(query(None, None).validated().unwrap(), (20, 0));
        assert_eq!(query(Some(5), Some(10)).validated().unwrap(), (5, 10));
    }

    #[test]
    fn test_pagination_bounds() {
        assert!(query(Some(0), None).validated().is_err());
        assert!(query(Some(101), None).validated().is_err());
        assert!(query(None, Some(-1)).validated().is_err());
        assert!(query(Some(100), Some(0)).validated().is_ok());
    }

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/health",
            "/api/v1/auth/register",
            "/api/v1/auth/login",
            "/api/v1/auth/me",
            "/api/v1/auth/logout",
            "/api/v1/students/dashboard",
            "/api/v1/students/courses",
            "/api/v1/students/courses/{course_id}",
            "/api/v1/students/lessons/{lesson_id}/complete",
            "/api/v1/students/university-pathway",
            "/api/v1/students/study-plan",
            "/api/v1/teachers/dashboard",
            "/api/v1/teachers/courses",
            "/api/v1/teachers/courses/{course_id}/progress",
            "/api/v1/courses/",
            "/api/v1/assessments/",
            "/api/v1/university/options",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
