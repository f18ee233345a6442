use axum::{Json, Router, http::StatusCode, middleware, response::IntoResponse, routing::get};

use crate::{
    analytics::universities::UNIVERSITIES,
    web::{
        AppState, RequestContext, WebResult, dto::university::UniversityOptionResponse,
        error::ErrorResponse, middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/options", get(university_options_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/university/options",
    description = "Universities with their minimum ATAR and offered disciplines",
    responses(
        (status = 200, description = "Options collected", body = Vec<UniversityOptionResponse>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
    ),
    tag = "university",
    security(
        ("cookie" = [])
    )
)]
async fn university_options_handler(ctx: RequestContext) -> WebResult<impl IntoResponse> {
    ctx.user()?;

    let options: Vec<UniversityOptionResponse> =
        UNIVERSITIES.iter().map(UniversityOptionResponse::from).collect();

    Ok((StatusCode::OK, Json(options)))
}
