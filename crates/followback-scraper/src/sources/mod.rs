//! Profile source adapters.
//!
//! Each adapter fetches one upstream and returns a validated
//! [`ProfileSnapshot`] or a classified [`SourceError`]. Adapters share the
//! HTTP client but no mutable state. [`default_profile_sources`] returns them
//! in priority order; the analyzer walks that order and keeps the first
//! success.

mod apify;
mod graphql;
mod hosted;
pub(crate) mod mobile_api;
mod profile_page;
pub(crate) mod rapidapi;
mod scrapingbee;
mod stats_sites;
mod web_api;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use followback_core::{AppConfig, Credentials, ProfileSnapshot, Username};

use crate::client::InstagramClient;
use crate::error::SourceError;
use crate::pagination::PaginationLimits;

pub use apify::ApifySource;
pub use graphql::GraphqlSource;
pub use hosted::{BrightDataSource, ZyteSource};
pub use mobile_api::MobileApiSource;
pub use profile_page::ProfilePageSource;
pub use rapidapi::RapidApiSource;
pub use scrapingbee::ScrapingBeeSource;
pub use stats_sites::{HypeAuditorSource, SocialBladeSource};
pub use web_api::WebApiSessionSource;

/// Capability shared by every profile adapter.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;

    /// `false` when a required credential is missing. Unavailable sources
    /// are skipped without being called.
    fn is_available(&self) -> bool {
        true
    }

    /// # Errors
    ///
    /// A [`SourceError`] classified by [`SourceError::kind`].
    async fn fetch_profile(&self, username: &Username) -> Result<ProfileSnapshot, SourceError>;
}

/// Base URLs of every upstream. Overridable so tests can point adapters at a
/// local mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub mobile_api: String,
    pub web: String,
    pub graph_api: String,
    pub basic_display: String,
    pub socialblade: String,
    pub hypeauditor: String,
    pub rapidapi: String,
    pub scrapingbee: String,
    pub brightdata: String,
    pub zyte: String,
    pub apify: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            mobile_api: "https://i.instagram.com".to_owned(),
            web: "https://www.instagram.com".to_owned(),
            graph_api: "https://graph.instagram.com".to_owned(),
            basic_display: "https://api.instagram.com".to_owned(),
            socialblade: "https://socialblade.com".to_owned(),
            hypeauditor: "https://hypeauditor.com".to_owned(),
            rapidapi: "https://instagram-scraper-2022.p.rapidapi.com".to_owned(),
            scrapingbee: "https://app.scrapingbee.com".to_owned(),
            brightdata: "https://api.brightdata.com".to_owned(),
            zyte: "https://app.zyte.com".to_owned(),
            apify: "https://api.apify.com".to_owned(),
        }
    }
}

impl Endpoints {
    /// Every upstream served from one base URL.
    #[must_use]
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_owned();
        Self {
            mobile_api: base.clone(),
            web: base.clone(),
            graph_api: base.clone(),
            basic_display: base.clone(),
            socialblade: base.clone(),
            hypeauditor: base.clone(),
            rapidapi: base.clone(),
            scrapingbee: base.clone(),
            brightdata: base.clone(),
            zyte: base.clone(),
            apify: base,
        }
    }
}

/// Everything needed to build the adapter lists.
#[derive(Debug, Clone)]
pub struct ScraperSettings {
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub page_size: u32,
    pub pagination: PaginationLimits,
    pub endpoints: Endpoints,
    pub credentials: Credentials,
}

impl ScraperSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            request_timeout_secs: config.request_timeout_secs,
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
            page_size: config.page_size,
            pagination: PaginationLimits {
                max_pages: config.pagination_max_pages,
                max_items: config.pagination_max_items,
                rate_limit_backoff: Duration::from_millis(config.rate_limit_backoff_ms),
            },
            endpoints: Endpoints::default(),
            credentials: config.credentials.clone(),
        }
    }

    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn build_client(&self) -> Result<InstagramClient, SourceError> {
        InstagramClient::new(
            self.request_timeout_secs,
            self.max_retries,
            self.retry_backoff_base_ms,
        )
    }
}

/// State every adapter holds a handle to.
#[derive(Debug, Clone)]
pub(crate) struct SourceContext {
    pub client: Arc<InstagramClient>,
    pub endpoints: Arc<Endpoints>,
}

/// All profile adapters in priority order.
#[must_use]
pub fn default_profile_sources(
    client: Arc<InstagramClient>,
    settings: &ScraperSettings,
) -> Vec<Box<dyn ProfileSource>> {
    let ctx = SourceContext {
        client,
        endpoints: Arc::new(settings.endpoints.clone()),
    };
    let creds = &settings.credentials;
    vec![
        Box::new(MobileApiSource::new(ctx.clone())),
        Box::new(WebApiSessionSource::new(ctx.clone())),
        Box::new(ProfilePageSource::new(ctx.clone())),
        Box::new(GraphqlSource::new(ctx.clone())),
        Box::new(SocialBladeSource::new(ctx.clone())),
        Box::new(HypeAuditorSource::new(ctx.clone())),
        Box::new(RapidApiSource::new(ctx.clone(), creds.rapidapi_key.clone())),
        Box::new(ScrapingBeeSource::new(ctx.clone(), creds.scrapingbee_key.clone())),
        Box::new(BrightDataSource::new(ctx.clone(), creds.brightdata_key.clone())),
        Box::new(ZyteSource::new(ctx.clone(), creds.zyte_key.clone())),
        Box::new(ApifySource::new(ctx, creds.apify_token.clone())),
    ]
}

/// Returns the credential or an [`SourceError::Unavailable`] naming `var`.
pub(crate) fn require_credential<'a>(
    source_name: &'static str,
    credential: Option<&'a str>,
    var: &str,
) -> Result<&'a str, SourceError> {
    credential.ok_or_else(|| SourceError::unavailable(source_name, format!("{var} not configured")))
}

/// Appends `?key=value` pairs with proper encoding.
pub(crate) fn url_with_query(base: &str, pairs: &[(&str, &str)]) -> Result<String, SourceError> {
    let mut url = reqwest::Url::parse(base).map_err(|e| SourceError::InvalidUrl {
        url: base.to_owned(),
        reason: e.to_string(),
    })?;
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(url.to_string())
}
