use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tower_cookies::{Cookie, Cookies};

use crate::{
    model::{
        CrudRepository, ResourceTyped, StoreError,
        entity::{UserEntity, UserEntityCreate},
    },
    web::{
        AppState, RequestContext, UserRole, WebError, WebResult,
        error::ErrorResponse,
        middlewares::{self, SESSION_COOKIE, session_cookie},
    },
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignUpBody {
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignInBody {
    pub email: String,
}

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(account_me_handler))
        .route_layer(middleware::from_fn_with_state(
            state,
            middlewares::extract_context_fn,
        ));

    Router::new()
        .route("/signup", post(account_signup_handler))
        .route("/signin", post(account_signin_handler))
        .route("/signout", post(account_signout_handler))
        .merge(protected)
}

#[utoipa::path(
    post,
    path = "/api/v1/account/signup",
    request_body = SignUpBody,
    description = "Registers a new user and starts a session",
    responses(
        (status = 200, description = "User created successfully", body = UserEntity),
        (status = 400, description = "Malformed input", body = ErrorResponse),
        (status = 409, description = "User already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "account"
)]
async fn account_signup_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<SignUpBody>,
) -> WebResult<impl IntoResponse> {
    let email = payload.email.trim().to_string();
    if email.is_empty() || payload.name.trim().is_empty() {
        return Err(WebError::resource_bad_request(
            UserEntity::get_resource_type(),
            "email and name are required",
        ));
    }

    let payload = UserEntityCreate {
        email,
        name: payload.name,
        role: payload.role,
    };

    let created = UserEntity::create(state.mm(), payload)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate { .. } => WebError::registration_conflict(),
            e => WebError::resource_fetch_error(UserEntity::get_resource_type(), e),
        })?;

    tracing::info!(user_id = %created.id(), role = %created.role(), "user registered");
    cookies.add(session_cookie(created.id()));

    Ok((StatusCode::OK, Json(created)))
}

#[utoipa::path(
    post,
    path = "/api/v1/account/signin",
    description = "Starts a session for an existing user",
    request_body = SignInBody,
    responses(
        (status = 200, description = "User signed in", body = UserEntity),
        (status = 401, description = "No user with this email", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "account",
)]
async fn account_signin_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<SignInBody>,
) -> WebResult<impl IntoResponse> {
    let found = UserEntity::find_by_email(state.mm(), payload.email.trim())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or(WebError::auth_invalid_credentials())?;

    cookies.add(session_cookie(found.id()));

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    post,
    path = "/api/v1/account/signout",
    description = "Ends the current session",
    responses(
        (status = 200, description = "Session cleared"),
    ),
    tag = "account",
)]
async fn account_signout_handler(cookies: Cookies) -> impl IntoResponse {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    cookies.remove(cookie);

    StatusCode::OK
}

#[utoipa::path(
    get,
    path = "/api/v1/account/me",
    description = "Returns the signed-in user",
    responses(
        (status = 200, description = "Current user", body = UserEntity),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "account",
    security(
        ("cookie" = [])
    )
)]
async fn account_me_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let found = UserEntity::find_by_id(state.mm(), user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or(WebError::resource_not_found(UserEntity::get_resource_type()))?;

    Ok((StatusCode::OK, Json(found)))
}
