use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub struct CookieAuthModifier;

impl Modify for CookieAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "SID",
                    "JWT token for current user",
                ))),
            );
            schema.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::health_handler,
        crate::web::routes::auth::auth_register_handler,
        crate::web::routes::auth::auth_login_handler,
        crate::web::routes::auth::auth_me_handler,
        crate::web::routes::auth::auth_logout_handler,
        crate::web::routes::students::students_dashboard_handler,
        crate::web::routes::students::students_courses_handler,
        crate::web::routes::students::students_course_handler,
        crate::web::routes::students::students_complete_lesson_handler,
        crate::web::routes::students::students_pathway_handler,
        crate::web::routes::students::students_study_plan_handler,
        crate::web::routes::teachers::teachers_dashboard_handler,
        crate::web::routes::teachers::teachers_courses_handler,
        crate::web::routes::teachers::teachers_course_progress_handler,
        crate::web::routes::courses::courses_list_handler,
        crate::web::routes::assessments::assessments_list_handler,
        crate::web::routes::university::university_options_handler,
    ),
    modifiers(&CookieAuthModifier),
)]
pub struct ApiDoc;
