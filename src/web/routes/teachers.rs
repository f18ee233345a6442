use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    analytics,
    model::{
        CrudRepository, ResourceTyped, check_access,
        entity::{
            Assessment, Course, EnrolledStudentRow, Enrollment, TeacherCourseRow, TeacherEntity,
            UserEntity,
        },
    },
    web::{
        AppState, AuthenticatedUser, RequestContext, UserRole, WebError, WebResult,
        dto::teachers::{
            ClassProgress, StudentProgress, TeacherCourseOverview, TeacherCourseWithStudents,
            TeacherDashboard,
        },
        error::ErrorResponse,
        middlewares,
    },
};

const DASHBOARD_ASSESSMENTS_PER_COURSE: i64 = 5;

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/dashboard", get(teachers_dashboard_handler))
        .route("/courses", get(teachers_courses_handler))
        .route("/courses/{course_id}/progress", get(teachers_course_progress_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

/// Teacher profile of the current user, 404 when the profile row is missing.
async fn teacher_profile(state: &AppState, user: &AuthenticatedUser) -> WebResult<TeacherEntity> {
    TeacherEntity::find_by_user_id(state.pool(), user, user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(TeacherEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(TeacherEntity::get_resource_type()))
}

#[utoipa::path(
    get,
    path = "/api/v1/teachers/dashboard",
    description = "Course and enrollment totals with the first assessments of every course",
    responses(
        (status = 200, description = "Dashboard collected", body = TeacherDashboard),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "Teachers only", body = ErrorResponse),
        (status = 404, description = "Teacher profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "teachers",
    security(
        ("cookie" = [])
    )
)]
async fn teachers_dashboard_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.require_role(UserRole::Teacher)?;
    let teacher = teacher_profile(&state, user).await?;
    let mm = state.pool();

    let profile = UserEntity::find_by_id(mm, user, user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(UserEntity::get_resource_type()))?;

    let rows = TeacherCourseRow::all_by_teacher(mm, user, teacher.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    let mut courses = Vec::with_capacity(rows.len());
    for course in rows {
        let assessments =
            Assessment::first_by_course(mm, user, course.id, DASHBOARD_ASSESSMENTS_PER_COURSE)
                .await
                .map_err(|e| WebError::resource_fetch_error(Assessment::get_resource_type(), e))?;
        courses.push(TeacherCourseOverview {
            course,
            assessments,
        });
    }

    Ok((
        StatusCode::OK,
        Json(TeacherDashboard::new(profile, teacher, courses)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/teachers/courses",
    description = "Courses taught by the current teacher with their enrolled students",
    responses(
        (status = 200, description = "Courses collected", body = Vec<TeacherCourseWithStudents>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "Teachers only", body = ErrorResponse),
        (status = 404, description = "Teacher profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "teachers",
    security(
        ("cookie" = [])
    )
)]
async fn teachers_courses_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.require_role(UserRole::Teacher)?;
    let teacher = teacher_profile(&state, user).await?;
    let mm = state.pool();

    let rows = TeacherCourseRow::all_by_teacher(mm, user, teacher.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    let mut courses = Vec::with_capacity(rows.len());
    for course in rows {
        let students = EnrolledStudentRow::all_by_course(mm, user, course.id)
            .await
            .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;
        courses.push(TeacherCourseWithStudents { course, students });
    }

    Ok((StatusCode::OK, Json(courses)))
}

#[utoipa::path(
    get,
    path = "/api/v1/teachers/courses/{course_id}/progress",
    description = "Completion statistics of every student enrolled in an owned course",
    params(
        ("course_id" = Uuid, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Class progress", body = ClassProgress),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "Not your course", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "teachers",
    security(
        ("cookie" = [])
    )
)]
async fn teachers_course_progress_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.require_role(UserRole::Teacher)?;
    let teacher = teacher_profile(&state, user).await?;
    let mm = state.pool();

    let course = Course::find_by_id(mm, user, course_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Course::get_resource_type()))?;

    check_access(mm, user, &course, teacher.id())
        .await
        .map_err(|e| WebError::resource_access_error(Course::get_resource_type(), e))?;

    let info = Course::info_by_id(mm, user, course_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Course::get_resource_type()))?;

    let roster = EnrolledStudentRow::all_by_course(mm, user, course_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;

    let mut completion = analytics::class_completion(mm, course_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;

    let students = roster
        .into_iter()
        .map(|student| {
            // the enrollment may have been removed since the roster was read
            let stats = completion.remove(&student.student_id).unwrap_or_default();
            StudentProgress { student, stats }
        })
        .collect();

    Ok((StatusCode::OK, Json(ClassProgress::new(info, students))))
}
