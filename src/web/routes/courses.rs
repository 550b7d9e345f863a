use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, ModelManager, Page, PaginatableRepository, ResourceTyped, check_access,
        entity::{
            Course, CourseCreate, Enrollment, EnrollmentCreate, Lecture, StudentProgress,
            UserEntity,
        },
    },
    progress::{self, CourseProgress, ProgressIndex},
    web::{
        AppState, AuthenticatedUser, RequestContext, WebError, WebResult,
        dto::{
            courses::{CourseCreateBody, CourseSearchQuery},
            lectures::{LectureCreateBody, LectureView},
        },
        error::ErrorResponse,
        middlewares,
        routes::PaginationQuery,
    },
};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(courses_search_handler).post(courses_create_handler))
        .route("/page", get(courses_page_handler))
        .route("/mine", get(courses_mine_handler))
        .route("/{id}", get(courses_get_handler))
        .route(
            "/{id}/lectures",
            get(courses_lectures_handler).post(courses_lecture_create_handler),
        )
        .route("/{id}/enroll", post(courses_enroll_handler))
        .route("/{id}/enrollments", get(courses_enrollments_handler))
        .route("/{id}/progress", get(courses_progress_handler))
        .route_layer(middleware::from_fn_with_state(
            state,
            middlewares::extract_context_fn,
        ))
}

async fn fetch_course(mm: &ModelManager, id: Uuid) -> WebResult<Course> {
    Course::find_by_id(mm, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?
        .ok_or(WebError::resource_not_found(Course::get_resource_type()))
}

pub(crate) async fn ensure_enrolled(
    mm: &ModelManager,
    student: &AuthenticatedUser,
    course_id: Uuid,
) -> WebResult<()> {
    let enrolled = Enrollment::is_enrolled(mm, student.user_id(), course_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;

    if enrolled {
        Ok(())
    } else {
        Err(WebError::not_enrolled())
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/courses",
    params(CourseSearchQuery),
    description = "Search courses by title, description or instructor name",
    responses(
        (status = 200, description = "Matching courses", body = Vec<Course>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_search_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(query): Query<CourseSearchQuery>,
) -> WebResult<impl IntoResponse> {
    ctx.user()?;

    let found = Course::search(state.mm(), query.q.as_deref().unwrap_or_default())
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/page",
    params(PaginationQuery),
    description = "Page through every course",
    responses(
        (status = 200, description = "Courses page", body = Page<Course>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_page_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> WebResult<impl IntoResponse> {
    ctx.user()?;

    let page = Course::page(state.mm(), pagination.limit, pagination.offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses",
    request_body = CourseCreateBody,
    description = "Create a course owned by the signed-in instructor",
    responses(
        (status = 200, description = "Course created", body = Course),
        (status = 400, description = "Invalid course", body = ErrorResponse),
        (status = 403, description = "Only instructors can create courses", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<CourseCreateBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.instructor()?;

    payload
        .validate()
        .map_err(|reason| WebError::resource_bad_request(Course::get_resource_type(), reason))?;

    let instructor = UserEntity::find_by_id(state.mm(), user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or(WebError::resource_not_found(UserEntity::get_resource_type()))?;

    let created = Course::create(
        state.mm(),
        CourseCreate {
            title: payload.title,
            description: payload.description,
            instructor_id: instructor.id(),
            instructor_name: instructor.name().to_string(),
        },
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    tracing::info!(course_id = %created.id(), "course created");

    Ok((StatusCode::OK, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/mine",
    description = "Courses owned by the signed-in instructor",
    responses(
        (status = 200, description = "Owned courses", body = Vec<Course>),
        (status = 403, description = "Only instructors own courses", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_mine_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.instructor()?;

    let owned = Course::all_by_instructor(state.mm(), user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(owned)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course id")
    ),
    description = "Get a course",
    responses(
        (status = 200, description = "Course found", body = Course),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    ctx.user()?;

    let course = fetch_course(state.mm(), id).await?;

    Ok((StatusCode::OK, Json(course)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}/lectures",
    params(
        ("id" = Uuid, Path, description = "Course id")
    ),
    description = "Lectures of a course in order. The owning instructor gets full lectures, \
                   everyone else gets views without quiz answers. Students must be enrolled and \
                   only see the body of unlocked lectures",
    responses(
        (status = 200, description = "Lectures in order", body = Vec<LectureView>),
        (status = 403, description = "Not enrolled", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_lectures_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<Response> {
    let user = ctx.user()?;
    let course = fetch_course(state.mm(), id).await?;

    let lectures = Lecture::all_by_course(state.mm(), course.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(Lecture::get_resource_type(), e))?;

    if course.instructor_id() == user.user_id() {
        return Ok((StatusCode::OK, Json(lectures)).into_response());
    }

    let views: Vec<LectureView> = if user.is_instructor() {
        lectures.iter().map(|l| LectureView::new(l, false, true)).collect()
    } else {
        ensure_enrolled(state.mm(), user, course.id()).await?;

        let index = ProgressIndex::load(state.mm())
            .await
            .map_err(|e| WebError::resource_fetch_error(StudentProgress::get_resource_type(), e))?;
        let standing = CourseProgress::compute(
            course.id(),
            &lectures,
            index.get(user.user_id(), course.id()),
        );

        lectures
            .iter()
            .map(|l| LectureView::new(l, standing.is_completed(l.id()), standing.can_access(l.id())))
            .collect()
    };

    Ok((StatusCode::OK, Json(views)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/courses/{id}/lectures",
    params(
        ("id" = Uuid, Path, description = "Course id")
    ),
    request_body = LectureCreateBody,
    description = "Append a lecture to a course owned by the signed-in instructor",
    responses(
        (status = 200, description = "Lecture created", body = Lecture),
        (status = 400, description = "Invalid lecture", body = ErrorResponse),
        (status = 403, description = "Not the course owner", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_lecture_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LectureCreateBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.instructor()?;
    let course = fetch_course(state.mm(), id).await?;

    check_access(state.mm(), &course, user.user_id())
        .await
        .map_err(|e| WebError::resource_access_error(Course::get_resource_type(), e))?;

    let create = payload
        .into_create(course.id())
        .map_err(|reason| WebError::resource_bad_request(Lecture::get_resource_type(), reason))?;

    let created = Lecture::create(state.mm(), create)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lecture::get_resource_type(), e))?;

    tracing::info!(lecture_id = %created.id(), order = created.order(), "lecture created");

    Ok((StatusCode::OK, Json(created)))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses/{id}/enroll",
    params(
        ("id" = Uuid, Path, description = "Course id")
    ),
    description = "Enroll the signed-in student. Enrolling again keeps a single enrollment",
    responses(
        (status = 200, description = "Enrolled", body = Enrollment),
        (status = 403, description = "Only students can enroll", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_enroll_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.student()?;
    let course = fetch_course(state.mm(), id).await?;

    let enrollment = Enrollment::create(
        state.mm(),
        EnrollmentCreate {
            student_id: user.user_id(),
            course_id: course.id(),
        },
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(enrollment)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}/enrollments",
    params(
        ("id" = Uuid, Path, description = "Course id")
    ),
    description = "Enrollments of a course owned by the signed-in instructor",
    responses(
        (status = 200, description = "Enrollments", body = Vec<Enrollment>),
        (status = 403, description = "Not the course owner", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_enrollments_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.instructor()?;
    let course = fetch_course(state.mm(), id).await?;

    check_access(state.mm(), &course, user.user_id())
        .await
        .map_err(|e| WebError::resource_access_error(Course::get_resource_type(), e))?;

    let enrollments = Enrollment::all_by_course(state.mm(), course.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(enrollments)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}/progress",
    params(
        ("id" = Uuid, Path, description = "Course id")
    ),
    description = "Per-lecture state, completion percentage and next lecture for the signed-in student",
    responses(
        (status = 200, description = "Course progress", body = CourseProgress),
        (status = 403, description = "Not enrolled", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_progress_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.student()?;
    let course = fetch_course(state.mm(), id).await?;
    ensure_enrolled(state.mm(), user, course.id()).await?;

    let standing = progress::course_progress(state.mm(), user.user_id(), course.id())
        .await
        .map_err(|e| WebError::progress_error(StudentProgress::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(standing)))
}
