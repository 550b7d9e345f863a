use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::get,
};

use crate::{
    model::{ResourceTyped, entity::StudentProgress},
    progress,
    web::{
        AppState, RequestContext, WebError, WebResult, dto::progress::OverviewResponse,
        error::ErrorResponse, middlewares,
    },
};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(progress_get_handler))
        .route_layer(middleware::from_fn_with_state(
            state,
            middlewares::extract_context_fn,
        ))
}

#[utoipa::path(
    get,
    path = "/api/v1/progress",
    description = "Dashboard for the signed-in user. Students get their progress across enrolled \
                   courses, instructors get totals over the courses they own",
    responses(
        (status = 200, description = "Overview", body = OverviewResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "progress",
    security(
        ("cookie" = [])
    )
)]
async fn progress_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let res = if user.is_instructor() {
        progress::instructor_overview(state.mm(), user.user_id())
            .await
            .map(OverviewResponse::Instructor)
    } else {
        progress::student_overview(state.mm(), user.user_id())
            .await
            .map(OverviewResponse::Student)
    }
    .map_err(|e| WebError::progress_error(StudentProgress::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(res)))
}
