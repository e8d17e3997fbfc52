//! Request header profiles.
//!
//! Instagram serves different payloads depending on who it thinks is asking,
//! so each adapter picks one of these profiles rather than relying on the
//! client's default headers.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE, REFERER, USER_AGENT};

use super::session::Session;

pub const MOBILE_USER_AGENT: &str = "Instagram 155.0.0.37.107";

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Web client application id sent by instagram.com itself.
pub const IG_APP_ID: &str = "936619743392459";

const X_IG_APP_ID: &str = "x-ig-app-id";
const X_CSRF_TOKEN: &str = "x-csrftoken";
const X_REQUESTED_WITH: &str = "x-requested-with";

/// Headers of the Instagram mobile app.
#[must_use]
pub fn mobile_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(MOBILE_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(X_IG_APP_ID, HeaderValue::from_static(IG_APP_ID));
    headers
}

/// Headers of a desktop browser navigating to a page.
#[must_use]
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers
}

/// Headers of the instagram.com web app issuing an XHR, with session
/// cookies and CSRF token attached when a session is available.
#[must_use]
pub fn xhr_headers(web_base: &str, session: Option<&Session>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(X_IG_APP_ID, HeaderValue::from_static(IG_APP_ID));
    headers.insert(X_REQUESTED_WITH, HeaderValue::from_static("XMLHttpRequest"));
    if let Ok(referer) = HeaderValue::from_str(&format!("{web_base}/")) {
        headers.insert(REFERER, referer);
    }
    if let Some(session) = session {
        apply_session(&mut headers, session);
    }
    headers
}

/// Adds `Cookie` and `X-CSRFToken` from `session`. Values that are not
/// valid header text are dropped.
pub fn apply_session(headers: &mut HeaderMap, session: &Session) {
    if !session.cookie_header().is_empty() {
        if let Ok(value) = HeaderValue::from_str(session.cookie_header()) {
            headers.insert(COOKIE, value);
        }
    }
    if let Some(token) = session.csrf_token() {
        if let Ok(value) = HeaderValue::from_str(token) {
            headers.insert(X_CSRF_TOKEN, value);
        }
    }
}
