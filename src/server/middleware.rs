//! Session cookie middleware

use super::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{Redirect, Response},
};
use std::sync::Arc;

pub const SESSION_COOKIE: &str = "session_id";

/// Pull the session token out of the Cookie header, if present.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|c| c.strip_prefix(SESSION_COOKIE).and_then(|c| c.strip_prefix('=')))
        .map(String::from)
}

/// Gate protected routes on a valid, unexpired session.
///
/// Missing or stale sessions get a redirect to the login page, never a 5xx;
/// from the browser's side this is navigation, not failure.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, Redirect> {
    match session_cookie(request.headers()) {
        Some(token) if state.sessions.validate(&token).await => Ok(next.run(request).await),
        _ => Err(Redirect::to("/login")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extracts_session_cookie() {
        let headers = headers_with_cookie("session_id=abc123");
        assert_eq!(session_cookie(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn test_extracts_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; session_id=abc123; lang=en");
        assert_eq!(session_cookie(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn test_missing_cookie_header() {
        assert_eq!(session_cookie(&HeaderMap::new()), None);
    }

    #[test]
    fn test_other_cookies_only() {
        let headers = headers_with_cookie("theme=dark");
        assert_eq!(session_cookie(&headers), None);
    }

    #[test]
    fn test_prefix_name_does_not_match() {
        let headers = headers_with_cookie("session_id_old=abc123");
        assert_eq!(session_cookie(&headers), None);
    }
}
