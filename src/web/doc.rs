use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::web::middlewares::SESSION_COOKIE;

pub struct CookieAuthModifier;

impl Modify for CookieAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    SESSION_COOKIE,
                    "Id of the signed-in user",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::account::account_signup_handler,
        crate::web::routes::account::account_signin_handler,
        crate::web::routes::account::account_signout_handler,
        crate::web::routes::account::account_me_handler,
        crate::web::routes::courses::courses_search_handler,
        crate::web::routes::courses::courses_page_handler,
        crate::web::routes::courses::courses_create_handler,
        crate::web::routes::courses::courses_mine_handler,
        crate::web::routes::courses::courses_get_handler,
        crate::web::routes::courses::courses_lectures_handler,
        crate::web::routes::courses::courses_lecture_create_handler,
        crate::web::routes::courses::courses_enroll_handler,
        crate::web::routes::courses::courses_enrollments_handler,
        crate::web::routes::courses::courses_progress_handler,
        crate::web::routes::lectures::lectures_get_handler,
        crate::web::routes::lectures::lectures_complete_handler,
        crate::web::routes::lectures::lectures_submit_handler,
        crate::web::routes::progress::progress_get_handler,
    ),
    modifiers(&CookieAuthModifier),
    tags(
        (name = "account", description = "Sign up, sign in and session"),
        (name = "courses", description = "Courses, their lectures and enrollments"),
        (name = "lectures", description = "Opening and completing lectures"),
        (name = "progress", description = "Dashboards"),
    )
)]
pub struct ApiDoc;
