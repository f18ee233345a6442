use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    analytics::{
        self, StudentRecords,
        pathway::PathwayReport,
        progress::{CourseBreakdown, EnrollmentSummary},
    },
    model::{
        CrudRepository, ResourceTyped,
        entity::{
            Enrollment, Lesson, LessonProgress, LessonProgressCreate, StudentEntity, StudyPlan,
            StudySession, UniversityGoal, UserEntity,
        },
    },
    web::{
        AppState, AuthenticatedUser, RequestContext, UserRole, WebError, WebResult,
        dto::students::{CompleteLessonBody, StudentDashboard, StudyPlanResponse},
        error::ErrorResponse,
        middlewares,
    },
};

const UPCOMING_SESSIONS_LIMIT: i64 = 5;

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/dashboard", get(students_dashboard_handler))
        .route("/courses", get(students_courses_handler))
        .route("/courses/{course_id}", get(students_course_handler))
        .route("/lessons/{lesson_id}/complete", post(students_complete_lesson_handler))
        .route("/university-pathway", get(students_pathway_handler))
        .route("/study-plan", get(students_study_plan_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

/// Student profile of the current user, 404 when the profile row is missing.
async fn student_profile(state: &AppState, user: &AuthenticatedUser) -> WebResult<StudentEntity> {
    StudentEntity::find_by_user_id(state.pool(), user, user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(StudentEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(StudentEntity::get_resource_type()))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/dashboard",
    description = "Profile, course progress, upcoming assessments and study sessions",
    responses(
        (status = 200, description = "Dashboard collected", body = StudentDashboard),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "Students only", body = ErrorResponse),
        (status = 404, description = "Student profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "students",
    security(
        ("cookie" = [])
    )
)]
async fn students_dashboard_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.require_role(UserRole::Student)?;
    let student = student_profile(&state, user).await?;
    let mm = state.pool();
    let now = chrono::Utc::now();

    let profile = UserEntity::find_by_id(mm, user, user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(UserEntity::get_resource_type()))?;

    let (enrollments, upcoming_assessments, university_goal) = tokio::try_join!(
        analytics::enrollment_summaries(mm, student.id()),
        analytics::upcoming_assessments(mm, student.id(), now),
        mm.university_goal(student.id()),
    )
    .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;

    let plan = StudyPlan::latest_by_student(mm, user, student.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(StudyPlan::get_resource_type(), e))?;

    let upcoming_sessions = match plan {
        Some(plan) => StudySession::upcoming_by_plan(mm, user, plan.id(), now, UPCOMING_SESSIONS_LIMIT)
            .await
            .map_err(|e| WebError::resource_fetch_error(StudySession::get_resource_type(), e))?,
        None => Vec::new(),
    };

    let dashboard = StudentDashboard {
        user: profile,
        student,
        enrollments,
        upcoming_assessments,
        upcoming_sessions,
        university_goal,
    };

    Ok((StatusCode::OK, Json(dashboard)))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/courses",
    description = "Enrolled courses with completion statistics, in enrollment order",
    responses(
        (status = 200, description = "Courses collected", body = Vec<EnrollmentSummary>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "Students only", body = ErrorResponse),
        (status = 404, description = "Student profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "students",
    security(
        ("cookie" = [])
    )
)]
async fn students_courses_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.require_role(UserRole::Student)?;
    let student = student_profile(&state, user).await?;

    let summaries = analytics::enrollment_summaries(state.pool(), student.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(summaries)))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/courses/{course_id}",
    description = "Modules and lessons of an enrolled course with per-lesson status",
    params(
        ("course_id" = Uuid, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Course breakdown", body = CourseBreakdown),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "Students only", body = ErrorResponse),
        (status = 404, description = "Not enrolled in this course", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "students",
    security(
        ("cookie" = [])
    )
)]
async fn students_course_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.require_role(UserRole::Student)?;
    let student = student_profile(&state, user).await?;

    let breakdown = analytics::course_breakdown(state.pool(), student.id(), course_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Enrollment::get_resource_type()))?;

    Ok((StatusCode::OK, Json(breakdown)))
}

#[utoipa::path(
    post,
    path = "/api/v1/students/lessons/{lesson_id}/complete",
    description = "Marks a lesson of an enrolled course as completed",
    params(
        ("lesson_id" = Uuid, Path, description = "Lesson id")
    ),
    request_body = CompleteLessonBody,
    responses(
        (status = 200, description = "Progress recorded", body = LessonProgress),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "Students only", body = ErrorResponse),
        (status = 404, description = "Lesson not found or not enrolled", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "students",
    security(
        ("cookie" = [])
    )
)]
async fn students_complete_lesson_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(lesson_id): Path<Uuid>,
    body: Option<Json<CompleteLessonBody>>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.require_role(UserRole::Student)?;
    let student = student_profile(&state, user).await?;
    let mm = state.pool();

    let lesson = Lesson::find_by_id(mm, user, lesson_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;
    if lesson.is_none() {
        return Err(WebError::resource_not_found(Lesson::get_resource_type()));
    }

    let enrollment = Enrollment::find_by_lesson(mm, user, student.id(), lesson_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Enrollment::get_resource_type()))?;

    let time_spent = body
        .and_then(|Json(body)| body.time_spent)
        .unwrap_or(0)
        .max(0);

    let progress = LessonProgress::create(
        mm,
        user,
        LessonProgressCreate::completed(enrollment.id(), lesson_id, time_spent),
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(LessonProgress::get_resource_type(), e))?;

    tracing::debug!("student {} completed lesson {}", student.id(), lesson_id);

    Ok((StatusCode::OK, Json(progress)))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/university-pathway",
    description = "Matches the university goal's required subjects against enrolled courses",
    responses(
        (status = 200, description = "Pathway report", body = PathwayReport),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "Students only", body = ErrorResponse),
        (status = 404, description = "No university goal set", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "students",
    security(
        ("cookie" = [])
    )
)]
async fn students_pathway_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.require_role(UserRole::Student)?;
    let student = student_profile(&state, user).await?;

    let report = analytics::pathway_report(state.pool(), student.id(), student.atar())
        .await
        .map_err(|e| WebError::resource_fetch_error(UniversityGoal::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(UniversityGoal::get_resource_type()))?;

    Ok((StatusCode::OK, Json(report)))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/study-plan",
    description = "Latest study plan with all of its sessions",
    responses(
        (status = 200, description = "Study plan", body = StudyPlanResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "Students only", body = ErrorResponse),
        (status = 404, description = "No study plan", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "students",
    security(
        ("cookie" = [])
    )
)]
async fn students_study_plan_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.require_role(UserRole::Student)?;
    let student = student_profile(&state, user).await?;
    let mm = state.pool();

    let plan = StudyPlan::latest_by_student(mm, user, student.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(StudyPlan::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(StudyPlan::get_resource_type()))?;

    let sessions = StudySession::all_by_plan(mm, user, plan.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(StudySession::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(StudyPlanResponse { plan, sessions })))
}
