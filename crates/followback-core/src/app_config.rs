use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Optional upstream credentials. A source whose credential is `None`
/// reports itself unavailable and is skipped.
#[derive(Clone, Default)]
pub struct Credentials {
    pub instagram_access_token: Option<String>,
    pub rapidapi_key: Option<String>,
    pub scrapingbee_key: Option<String>,
    pub brightdata_key: Option<String>,
    pub zyte_key: Option<String>,
    pub apify_token: Option<String>,
}

fn redact(value: Option<&String>) -> Option<&'static str> {
    value.map(|_| "[redacted]")
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "instagram_access_token",
                &redact(self.instagram_access_token.as_ref()),
            )
            .field("rapidapi_key", &redact(self.rapidapi_key.as_ref()))
            .field("scrapingbee_key", &redact(self.scrapingbee_key.as_ref()))
            .field("brightdata_key", &redact(self.brightdata_key.as_ref()))
            .field("zyte_key", &redact(self.zyte_key.as_ref()))
            .field("apify_token", &redact(self.apify_token.as_ref()))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub credentials: Credentials,
    /// Per-HTTP-request timeout applied by the reqwest client.
    pub request_timeout_secs: u64,
    /// Upper bound on a single adapter invocation, including its retries.
    pub source_timeout_secs: u64,
    /// Global per-analysis deadline.
    pub deadline_secs: u64,
    pub cache_ttl_secs: u64,
    pub cache_capacity: usize,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub page_size: u32,
    pub pagination_max_pages: usize,
    pub pagination_max_items: usize,
    pub rate_limit_backoff_ms: u64,
}
