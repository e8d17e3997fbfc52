//! Hosted scraping services that return a ready-made user object.

use async_trait::async_trait;
use followback_core::{ProfileSnapshot, Username};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;

use crate::error::SourceError;
use crate::types::{InstagramUser, RawProfile};

use super::{require_credential, url_with_query, ProfileSource, SourceContext};

pub(crate) fn bearer_headers(
    source_name: &'static str,
    token: &str,
) -> Result<HeaderMap, SourceError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    let value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| SourceError::unavailable(source_name, "token is not valid header text"))?;
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

#[derive(Debug, Deserialize)]
struct BrightDataResponse {
    #[serde(default)]
    user: Option<InstagramUser>,
}

/// Bright Data Instagram scraper API. Requires `BRIGHTDATA_KEY`.
pub struct BrightDataSource {
    ctx: SourceContext,
    key: Option<String>,
}

impl BrightDataSource {
    const NAME: &'static str = "brightdata";

    pub(crate) fn new(ctx: SourceContext, key: Option<String>) -> Self {
        Self { ctx, key }
    }
}

#[async_trait]
impl ProfileSource for BrightDataSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_available(&self) -> bool {
        self.key.is_some()
    }

    async fn fetch_profile(&self, username: &Username) -> Result<ProfileSnapshot, SourceError> {
        let key = require_credential(Self::NAME, self.key.as_deref(), "BRIGHTDATA_KEY")?;
        let url = url_with_query(
            &format!("{}/scraper/instagram", self.ctx.endpoints.brightdata),
            &[("username", username.as_str())],
        )?;
        let response: BrightDataResponse = self
            .ctx
            .client
            .get_json(&url, bearer_headers(Self::NAME, key)?)
            .await?;
        response
            .user
            .map(RawProfile::from)
            .unwrap_or_default()
            .into_snapshot(username, Self::NAME)
    }
}

#[derive(Debug, Deserialize)]
struct ZyteResponse {
    #[serde(default)]
    profile: Option<InstagramUser>,
}

/// Zyte's Instagram profile extraction API. Requires `ZYTE_KEY`.
pub struct ZyteSource {
    ctx: SourceContext,
    key: Option<String>,
}

impl ZyteSource {
    const NAME: &'static str = "zyte";

    pub(crate) fn new(ctx: SourceContext, key: Option<String>) -> Self {
        Self { ctx, key }
    }
}

#[async_trait]
impl ProfileSource for ZyteSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_available(&self) -> bool {
        self.key.is_some()
    }

    async fn fetch_profile(&self, username: &Username) -> Result<ProfileSnapshot, SourceError> {
        let key = require_credential(Self::NAME, self.key.as_deref(), "ZYTE_KEY")?;
        let url = format!(
            "{}/api/v2/scraping/instagram/profile/{username}",
            self.ctx.endpoints.zyte
        );
        let response: ZyteResponse = self
            .ctx
            .client
            .get_json(&url, bearer_headers(Self::NAME, key)?)
            .await?;
        response
            .profile
            .map(RawProfile::from)
            .unwrap_or_default()
            .into_snapshot(username, Self::NAME)
    }
}
