use async_trait::async_trait;
use followback_core::{ProfileSnapshot, Username};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Deserialize;

use crate::error::SourceError;
use crate::types::{InstagramUser, ListUser, RawProfile};

use super::{require_credential, ProfileSource, SourceContext};

const NAME: &str = "rapidapi";

pub(crate) const RAPIDAPI_HOST: &str = "instagram-scraper-2022.p.rapidapi.com";

/// `userinfo` response. Some plans bundle follower/following samples.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct UserInfoResponse {
    #[serde(default)]
    pub user: Option<InstagramUser>,
    #[serde(default)]
    pub followers: Option<Vec<ListUser>>,
    #[serde(default)]
    pub following: Option<Vec<ListUser>>,
}

pub(crate) fn rapidapi_headers(key: &str) -> Result<HeaderMap, SourceError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert("x-rapidapi-host", HeaderValue::from_static(RAPIDAPI_HOST));
    headers.insert(
        "x-rapidapi-key",
        HeaderValue::from_str(key)
            .map_err(|_| SourceError::unavailable(NAME, "RAPIDAPI_KEY is not valid header text"))?,
    );
    Ok(headers)
}

pub(crate) async fn fetch_user_info(
    ctx: &SourceContext,
    key: &str,
    username: &str,
) -> Result<UserInfoResponse, SourceError> {
    let url = format!("{}/userinfo/{username}", ctx.endpoints.rapidapi);
    ctx.client.get_json(&url, rapidapi_headers(key)?).await
}

/// RapidAPI Instagram scraper. Requires `RAPIDAPI_KEY`.
pub struct RapidApiSource {
    ctx: SourceContext,
    key: Option<String>,
}

impl RapidApiSource {
    pub(crate) fn new(ctx: SourceContext, key: Option<String>) -> Self {
        Self { ctx, key }
    }
}

#[async_trait]
impl ProfileSource for RapidApiSource {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_available(&self) -> bool {
        self.key.is_some()
    }

    async fn fetch_profile(&self, username: &Username) -> Result<ProfileSnapshot, SourceError> {
        let key = require_credential(NAME, self.key.as_deref(), "RAPIDAPI_KEY")?;
        let response = fetch_user_info(&self.ctx, key, username.as_str()).await?;
        response
            .user
            .map(RawProfile::from)
            .unwrap_or_default()
            .into_snapshot(username, NAME)
    }
}
