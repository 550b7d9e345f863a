use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, ModelManager, ResourceTyped, StoreError, check_access,
        entity::{Lecture, StudentProgress},
    },
    progress::{self, CourseProgress, QuizSubmission},
    web::{
        AppState, AuthenticatedUser, RequestContext, WebError, WebResult,
        dto::lectures::{LectureView, QuizSubmitBody},
        error::ErrorResponse,
        middlewares,
        routes::courses::ensure_enrolled,
    },
};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/{id}", get(lectures_get_handler))
        .route("/{id}/complete", post(lectures_complete_handler))
        .route("/{id}/submit", post(lectures_submit_handler))
        .route_layer(middleware::from_fn_with_state(
            state,
            middlewares::extract_context_fn,
        ))
}

async fn fetch_lecture(mm: &ModelManager, id: Uuid) -> WebResult<Lecture> {
    Lecture::find_by_id(mm, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lecture::get_resource_type(), e))?
        .ok_or(WebError::resource_not_found(Lecture::get_resource_type()))
}

/// Lets a student through only when enrolled in the lecture's course and the
/// lecture is unlocked for them. Returns their current standing in the course.
async fn open_for_student(
    mm: &ModelManager,
    student: &AuthenticatedUser,
    lecture: &Lecture,
) -> WebResult<CourseProgress> {
    ensure_enrolled(mm, student, lecture.course_id()).await?;

    let standing = progress::course_progress(mm, student.user_id(), lecture.course_id())
        .await
        .map_err(|e| WebError::progress_error(StudentProgress::get_resource_type(), e))?;

    if !standing.can_access(lecture.id()) {
        return Err(WebError::lecture_locked());
    }

    Ok(standing)
}

#[utoipa::path(
    get,
    path = "/api/v1/lectures/{id}",
    params(
        ("id" = Uuid, Path, description = "Lecture id")
    ),
    description = "Open a lecture. The owning instructor gets the full lecture, students get a view \
                   without quiz answers once the lecture is unlocked",
    responses(
        (status = 200, description = "Lecture found", body = LectureView),
        (status = 403, description = "Not enrolled or lecture locked", body = ErrorResponse),
        (status = 404, description = "Lecture not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lectures",
    security(
        ("cookie" = [])
    )
)]
async fn lectures_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<Response> {
    let user = ctx.user()?;
    let lecture = fetch_lecture(state.mm(), id).await?;

    if user.is_instructor() {
        match check_access(state.mm(), &lecture, user.user_id()).await {
            Ok(()) => return Ok((StatusCode::OK, Json(lecture)).into_response()),
            Err(StoreError::Forbidden) => {}
            Err(e) => return Err(WebError::resource_fetch_error(Lecture::get_resource_type(), e)),
        }
        return Ok((StatusCode::OK, Json(LectureView::new(&lecture, false, true))).into_response());
    }

    let standing = open_for_student(state.mm(), user, &lecture).await?;
    let view = LectureView::new(&lecture, standing.is_completed(lecture.id()), true);

    Ok((StatusCode::OK, Json(view)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/lectures/{id}/complete",
    params(
        ("id" = Uuid, Path, description = "Lecture id")
    ),
    description = "Mark a reading lecture as completed",
    responses(
        (status = 200, description = "Lecture completed", body = StudentProgress),
        (status = 400, description = "Not a reading lecture", body = ErrorResponse),
        (status = 403, description = "Not enrolled or lecture locked", body = ErrorResponse),
        (status = 404, description = "Lecture not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lectures",
    security(
        ("cookie" = [])
    )
)]
async fn lectures_complete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.student()?;
    let lecture = fetch_lecture(state.mm(), id).await?;
    open_for_student(state.mm(), user, &lecture).await?;

    let record = progress::complete_reading(state.mm(), user.user_id(), &lecture)
        .await
        .map_err(|e| WebError::progress_error(StudentProgress::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(record)))
}

#[utoipa::path(
    post,
    path = "/api/v1/lectures/{id}/submit",
    params(
        ("id" = Uuid, Path, description = "Lecture id")
    ),
    request_body = QuizSubmitBody,
    description = "Submit quiz answers. A passing score completes the lecture, a failing one changes nothing",
    responses(
        (status = 200, description = "Quiz scored", body = QuizSubmission),
        (status = 400, description = "Unanswered questions or not a quiz", body = ErrorResponse),
        (status = 403, description = "Not enrolled or lecture locked", body = ErrorResponse),
        (status = 404, description = "Lecture not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lectures",
    security(
        ("cookie" = [])
    )
)]
async fn lectures_submit_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuizSubmitBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.student()?;
    let lecture = fetch_lecture(state.mm(), id).await?;
    open_for_student(state.mm(), user, &lecture).await?;

    let answers = payload.into_answers();
    let submission = progress::submit_quiz(state.mm(), user.user_id(), &lecture, &answers)
        .await
        .map_err(|e| WebError::progress_error(StudentProgress::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(submission)))
}
