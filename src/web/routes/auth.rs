use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Duration;
use tower_cookies::{Cookie, Cookies, cookie::SameSite};
use uuid::Uuid;

use crate::{
    auth::{self, UserClaims, hash_password, verify_password},
    model::{
        CrudRepository, DatabaseError, ResourceTyped,
        entity::{StudentCreate, StudentEntity, TeacherCreate, TeacherEntity, UserEntity, UserEntityCreate},
    },
    web::{
        AppState, AuthenticatedUser, RequestContext, UserRole, WebError, WebResult,
        dto::auth::{LoginBody, LoginResponse, MeResponse, MessageResponse, RegisterBody, Registration},
        error::ErrorResponse,
        middlewares::{self, AUTH_TOKEN},
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    let protected = Router::new()
        .route("/me", get(auth_me_handler))
        .route("/logout", post(auth_logout_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ));

    Router::new()
        .route("/register", post(auth_register_handler))
        .route("/login", post(auth_login_handler))
        .merge(protected)
        .with_state(state)
}

/// Signs a token for `user_id` and sets it as the session cookie.
fn issue_session(state: &AppState, cookies: &Cookies, user_id: Uuid) -> WebResult<String> {
    let config = state.config();
    let claims = UserClaims::for_user(user_id, Duration::days(config.app().token_ttl_days()));
    let token = auth::generate_token(claims, config.app().jwt())
        .map_err(|e| WebError::server_crypt_error(e.into()))?;

    let mut cookie = Cookie::new(AUTH_TOKEN, token.clone());
    cookie.set_same_site(SameSite::Lax);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookies.add(cookie);

    Ok(token)
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterBody,
    description = "Creates a user with a student or teacher profile and signs it in",
    responses(
        (status = 201, description = "User created successfully", body = UserEntity),
        (status = 400, description = "Request body is invalid", body = ErrorResponse),
        (status = 409, description = "User already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth"
)]
async fn auth_register_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<RegisterBody>,
) -> WebResult<impl IntoResponse> {
    let registration = payload.validate()?;

    let admin = AuthenticatedUser::admin();
    let found = UserEntity::find_by_email(state.pool(), &admin, &payload.email)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    if found.is_some() {
        return Err(WebError::registration_conflict());
    }

    let hash = hash_password(&payload.password).map_err(WebError::server_crypt_error)?;
    let role = match registration {
        Registration::Student { .. } => UserRole::Student,
        Registration::Teacher { .. } => UserRole::Teacher,
    };

    let created = UserEntity::create(
        state.pool(),
        &admin,
        UserEntityCreate {
            email: payload.email.trim().to_string(),
            name: payload.name.trim().to_string(),
            password_hash: hash,
            role,
        },
    )
    .await
    .map_err(|e| match e {
        // lost a race against a concurrent registration
        DatabaseError::UniqueViolation(_) => WebError::registration_conflict(),
        e => WebError::resource_fetch_error(UserEntity::get_resource_type(), e),
    })?;

    match registration {
        Registration::Student { year_level } => {
            let data = StudentCreate {
                user_id: created.id(),
                year_level,
                atar: None,
            };
            StudentEntity::create(state.pool(), &admin, data)
                .await
                .map_err(|e| WebError::resource_fetch_error(StudentEntity::get_resource_type(), e))?;
        }
        Registration::Teacher { department } => {
            let data = TeacherCreate {
                user_id: created.id(),
                department,
                specialties: Vec::new(),
            };
            TeacherEntity::create(state.pool(), &admin, data)
                .await
                .map_err(|e| WebError::resource_fetch_error(TeacherEntity::get_resource_type(), e))?;
        }
    }

    tracing::info!("registered {} as {}", created.id(), created.role());
    issue_session(&state, &cookies, created.id())?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    description = "Authorizes user in the system",
    request_body = LoginBody,
    responses(
        (status = 200, description = "User signed in", body = LoginResponse),
        (status = 401, description = "Credentials invalid", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth",
)]
async fn auth_login_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginBody>,
) -> WebResult<impl IntoResponse> {
    let admin = AuthenticatedUser::admin();
    let found = UserEntity::find_by_email(state.pool(), &admin, &payload.email)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(WebError::auth_invalid_credentials)?;

    let is_verified =
        verify_password(found.hash(), &payload.password).map_err(WebError::server_crypt_error)?;

    if !is_verified {
        return Err(WebError::auth_invalid_credentials());
    }

    let token = issue_session(&state, &cookies, found.id())?;

    Ok((StatusCode::OK, Json(LoginResponse { user: found, token })))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    description = "Current user with its student or teacher profile",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth",
    security(
        ("cookie" = [])
    )
)]
async fn auth_me_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let found = UserEntity::find_by_id(state.pool(), user, user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(UserEntity::get_resource_type()))?;

    let (student, teacher) = match user.user_role() {
        UserRole::Student => {
            let student = StudentEntity::find_by_user_id(state.pool(), user, user.user_id())
                .await
                .map_err(|e| WebError::resource_fetch_error(StudentEntity::get_resource_type(), e))?;
            (student, None)
        }
        UserRole::Teacher => {
            let teacher = TeacherEntity::find_by_user_id(state.pool(), user, user.user_id())
                .await
                .map_err(|e| WebError::resource_fetch_error(TeacherEntity::get_resource_type(), e))?;
            (None, teacher)
        }
        UserRole::Admin => (None, None),
    };

    Ok((
        StatusCode::OK,
        Json(MeResponse {
            user: found,
            student,
            teacher,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    description = "Removes the session cookie",
    responses(
        (status = 200, description = "Signed out", body = MessageResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
    ),
    tag = "auth",
    security(
        ("cookie" = [])
    )
)]
async fn auth_logout_handler(ctx: RequestContext, cookies: Cookies) -> WebResult<impl IntoResponse> {
    ctx.user()?;

    let mut cookie = Cookie::new(AUTH_TOKEN, "");
    cookie.set_path("/");
    cookies.remove(cookie);

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: String::from("Logged out successfully"),
        }),
    ))
}
