use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {url} (retry after {retry_after_secs}s)")]
    RateLimited { url: String, retry_after_secs: u64 },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("unexpected content type \"{content_type}\" from {url}")]
    UnexpectedContentType { content_type: String, url: String },

    #[error("invalid upstream URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no extraction strategy matched {context}")]
    NoStrategyMatched { context: String },

    #[error("{source_name} returned no follower or following count")]
    MissingCounts { source_name: &'static str },

    #[error("{source_name} response is missing {field}")]
    MissingField {
        source_name: &'static str,
        field: &'static str,
    },

    #[error("{source_name} is unavailable: {reason}")]
    Unavailable {
        source_name: &'static str,
        reason: String,
    },

    #[error("{source_name} timed out after {timeout_ms}ms")]
    Timeout {
        source_name: &'static str,
        timeout_ms: u64,
    },
}

/// Closed classification of adapter failures, used for logging and for
/// deciding whether a failure counts as a skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Network,
    RateLimited,
    Unparseable,
    Unavailable,
}

impl FailureKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::RateLimited => "rate_limited",
            Self::Unparseable => "unparseable",
            Self::Unavailable => "unavailable",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strips the request URL, which may carry a credential in its query.
impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

/// Query parameters whose values are credentials.
const SECRET_QUERY_PARAMS: [&str; 5] = ["access_token", "api_key", "apikey", "key", "token"];

fn is_secret_param(key: &str) -> bool {
    SECRET_QUERY_PARAMS
        .iter()
        .any(|secret| key.eq_ignore_ascii_case(secret))
}

/// Renders `url` for error messages with credential values masked.
///
/// An unparseable URL loses its whole query string.
pub(crate) fn redact_url(url: &str) -> String {
    let Ok(mut parsed) = reqwest::Url::parse(url) else {
        return url.split_once('?').map_or(url, |(base, _)| base).to_owned();
    };
    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if !pairs.iter().any(|(k, _)| is_secret_param(k)) {
        return url.to_owned();
    }
    parsed.query_pairs_mut().clear().extend_pairs(pairs.iter().map(|(k, v)| {
        let value = if is_secret_param(k) { "REDACTED" } else { v.as_str() };
        (k.as_str(), value)
    }));
    parsed.to_string()
}

impl SourceError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Http(e) if e.is_decode() => FailureKind::Unparseable,
            Self::Http(_) | Self::UnexpectedStatus { .. } | Self::Timeout { .. } => {
                FailureKind::Network
            }
            Self::RateLimited { .. } => FailureKind::RateLimited,
            Self::Deserialize { .. }
            | Self::NotFound { .. }
            | Self::UnexpectedContentType { .. }
            | Self::InvalidUrl { .. }
            | Self::NoStrategyMatched { .. }
            | Self::MissingCounts { .. }
            | Self::MissingField { .. } => FailureKind::Unparseable,
            Self::Unavailable { .. } => FailureKind::Unavailable,
        }
    }

    pub(crate) fn unavailable(source_name: &'static str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            source_name,
            reason: reason.into(),
        }
    }
}
