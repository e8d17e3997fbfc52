use async_trait::async_trait;
use followback_core::{ProfileSnapshot, Username};

use crate::client::mobile_headers;
use crate::error::SourceError;
use crate::types::{RawProfile, WebProfileResponse};

use super::{url_with_query, ProfileSource, SourceContext};

const NAME: &str = "mobile_api";

/// `web_profile_info` on the mobile API host, sent as the Instagram app.
pub struct MobileApiSource {
    ctx: SourceContext,
}

impl MobileApiSource {
    pub(crate) fn new(ctx: SourceContext) -> Self {
        Self { ctx }
    }
}

/// Fetches and converts `web_profile_info` from `base`. Shared with the
/// session adapter and the friendships user-id lookup.
pub(crate) async fn fetch_web_profile_info(
    ctx: &SourceContext,
    base: &str,
    headers: reqwest::header::HeaderMap,
    username: &str,
) -> Result<RawProfile, SourceError> {
    let url = url_with_query(
        &format!("{base}/api/v1/users/web_profile_info/"),
        &[("username", username)],
    )?;
    let response: WebProfileResponse = ctx.client.get_json(&url, headers).await?;
    Ok(response
        .data
        .and_then(|d| d.user)
        .map(RawProfile::from)
        .unwrap_or_default())
}

#[async_trait]
impl ProfileSource for MobileApiSource {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch_profile(&self, username: &Username) -> Result<ProfileSnapshot, SourceError> {
        let raw = fetch_web_profile_info(
            &self.ctx,
            &self.ctx.endpoints.mobile_api,
            mobile_headers(),
            username.as_str(),
        )
        .await?;
        raw.into_snapshot(username, NAME)
    }
}
