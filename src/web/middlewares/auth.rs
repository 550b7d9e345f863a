use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_cookies::{Cookie, Cookies, cookie::SameSite};
use uuid::Uuid;

use crate::{
    model::{CrudRepository, ResourceTyped, entity::UserEntity},
    web::{AppState, RequestContext, context::AuthenticatedUser, error::WebError},
};

/// Holds the id of the signed-in user. No secret is involved: whoever presents
/// an id is that user.
pub static SESSION_COOKIE: &str = "SID";

pub fn session_cookie(user_id: Uuid) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, user_id.to_string());
    cookie.set_same_site(SameSite::Lax);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie
}

pub async fn extract_context_fn(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = match cookies.get(SESSION_COOKIE) {
        Some(token) if !token.value().is_empty() => token,
        _ => {
            req.extensions_mut().insert(RequestContext::new(None));
            return Ok(next.run(req).await);
        }
    };

    let id = token
        .value()
        .parse::<Uuid>()
        .map_err(|_| WebError::auth_cookie_invalid(SESSION_COOKIE))?;

    let user = UserEntity::find_by_id(state.mm(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    match user {
        Some(user) => {
            tracing::trace!(user_id = %id, role = %user.role(), "session resolved");
            req.extensions_mut().insert(RequestContext::new(Some(
                AuthenticatedUser::new(id, user.role()),
            )));
        }
        None => {
            req.extensions_mut().insert(RequestContext::new(None));
        }
    }

    Ok(next.run(req).await)
}
