//! Best-effort anonymous session bootstrap against instagram.com.

use std::sync::LazyLock;

use regex::Regex;

use super::headers::browser_headers;
use super::InstagramClient;

static CSRF_IN_PAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""csrf_token":"([^"]+)""#).expect("valid regex"));

/// Cookies and CSRF token captured from the landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    cookie_header: String,
    csrf_token: Option<String>,
}

impl Session {
    /// Builds a session from `name=value` cookie pairs.
    #[must_use]
    pub fn from_parts(cookies: Vec<String>, csrf_token: Option<String>) -> Self {
        Self {
            cookie_header: cookies.join("; "),
            csrf_token,
        }
    }

    /// Parses raw `Set-Cookie` values and the landing page body.
    ///
    /// The CSRF token comes from the `csrftoken` cookie when present, else
    /// from the `"csrf_token"` field embedded in the page.
    #[must_use]
    pub fn from_response(set_cookies: &[String], body: &str) -> Self {
        let cookies: Vec<String> = set_cookies
            .iter()
            .filter_map(|raw| raw.split(';').next())
            .map(str::trim)
            .filter(|pair| pair.contains('=') && !pair.ends_with('='))
            .map(str::to_owned)
            .collect();

        let csrf_token = cookies
            .iter()
            .find_map(|pair| pair.strip_prefix("csrftoken="))
            .map(str::to_owned)
            .or_else(|| {
                CSRF_IN_PAGE_RE
                    .captures(body)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_owned())
            });

        Self::from_parts(cookies, csrf_token)
    }

    #[must_use]
    pub fn cookie_header(&self) -> &str {
        &self.cookie_header
    }

    #[must_use]
    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookie_header.is_empty() && self.csrf_token.is_none()
    }
}

/// Fetches `{web_base}/` and captures whatever session state it hands out.
///
/// Returns `None` on any failure, or when the page set no cookies and
/// embedded no token; callers then proceed unauthenticated.
pub async fn bootstrap_session(client: &InstagramClient, web_base: &str) -> Option<Session> {
    let url = format!("{web_base}/");
    match client.get_with_cookies(&url, browser_headers()).await {
        Ok((body, set_cookies)) => {
            let session = Session::from_response(&set_cookies, &body);
            if session.is_empty() {
                tracing::debug!(url, "session bootstrap yielded no cookies or token");
                None
            } else {
                tracing::debug!(
                    url,
                    has_csrf = session.csrf_token.is_some(),
                    "session bootstrap succeeded"
                );
                Some(session)
            }
        }
        Err(e) => {
            tracing::debug!(url, error = %e, "session bootstrap failed, continuing unauthenticated");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_response_keeps_name_value_pairs_only() {
        let set_cookies = vec![
            "csrftoken=tok123; Path=/; Secure".to_string(),
            "mid=abc; Max-Age=100".to_string(),
            "sessionid=; expires=Thu, 01 Jan 1970 00:00:00 GMT".to_string(),
        ];
        let session = Session::from_response(&set_cookies, "");
        assert_eq!(session.cookie_header(), "csrftoken=tok123; mid=abc");
        assert_eq!(session.csrf_token(), Some("tok123"));
    }

    #[test]
    fn from_response_falls_back_to_embedded_token() {
        let body = r#"<script>{"config":{"csrf_token":"page-token"}}</script>"#;
        let session = Session::from_response(&[], body);
        assert_eq!(session.csrf_token(), Some("page-token"));
        assert_eq!(session.cookie_header(), "");
        assert!(!session.is_empty());
    }

    #[test]
    fn from_response_with_nothing_is_empty() {
        assert!(Session::from_response(&[], "<html></html>").is_empty());
    }
}
