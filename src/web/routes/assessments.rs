use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::get,
};

use crate::{
    model::{
        ResourceTyped,
        entity::{Assessment, StudentEntity, Submission, TeacherEntity},
    },
    web::{
        AppState, RequestContext, UserRole, WebError, WebResult,
        dto::assessments::AssessmentWithSubmissions,
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(assessments_list_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/assessments/",
    description = "Students get assessments of enrolled courses with their own submissions, teachers get their assessments with every submission",
    responses(
        (status = 200, description = "Assessments collected", body = Vec<AssessmentWithSubmissions>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "Students and teachers only", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "assessments",
    security(
        ("cookie" = [])
    )
)]
async fn assessments_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let mm = state.pool();

    let (assessments, submissions) = match user.user_role() {
        UserRole::Student => {
            let student = StudentEntity::find_by_user_id(mm, user, user.user_id())
                .await
                .map_err(|e| WebError::resource_fetch_error(StudentEntity::get_resource_type(), e))?
                .ok_or_else(|| WebError::resource_not_found(StudentEntity::get_resource_type()))?;

            tokio::try_join!(
                Assessment::all_by_student(mm, user, student.id()),
                Submission::all_by_student(mm, user, student.id()),
            )
            .map_err(|e| WebError::resource_fetch_error(Assessment::get_resource_type(), e))?
        }
        UserRole::Teacher => {
            let teacher = TeacherEntity::find_by_user_id(mm, user, user.user_id())
                .await
                .map_err(|e| WebError::resource_fetch_error(TeacherEntity::get_resource_type(), e))?
                .ok_or_else(|| WebError::resource_not_found(TeacherEntity::get_resource_type()))?;

            let assessments = Assessment::all_by_teacher(mm, user, teacher.id())
                .await
                .map_err(|e| WebError::resource_fetch_error(Assessment::get_resource_type(), e))?;
            let ids: Vec<_> = assessments.iter().map(|a| a.id()).collect();
            let submissions = Submission::all_by_assessments(mm, user, &ids)
                .await
                .map_err(|e| WebError::resource_fetch_error(Submission::get_resource_type(), e))?;

            (assessments, submissions)
        }
        UserRole::Admin => {
            return Err(WebError::resource_forbidden(Assessment::get_resource_type()));
        }
    };

    Ok((
        StatusCode::OK,
        Json(AssessmentWithSubmissions::group(assessments, submissions)),
    ))
}
