mod auth;
pub use auth::{SESSION_COOKIE, extract_context_fn, session_cookie};
