use async_trait::async_trait;
use followback_core::{ProfileSnapshot, Username};

use crate::client::browser_headers;
use crate::error::SourceError;
use crate::extract::extract_profile;

use super::{require_credential, url_with_query, ProfileSource, SourceContext};

const NAME: &str = "scrapingbee";

/// Profile page fetched through ScrapingBee's premium proxy, then run
/// through the same extraction strategies as a direct fetch. Requires
/// `SCRAPINGBEE_KEY`.
pub struct ScrapingBeeSource {
    ctx: SourceContext,
    key: Option<String>,
}

impl ScrapingBeeSource {
    pub(crate) fn new(ctx: SourceContext, key: Option<String>) -> Self {
        Self { ctx, key }
    }
}

#[async_trait]
impl ProfileSource for ScrapingBeeSource {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_available(&self) -> bool {
        self.key.is_some()
    }

    async fn fetch_profile(&self, username: &Username) -> Result<ProfileSnapshot, SourceError> {
        let key = require_credential(NAME, self.key.as_deref(), "SCRAPINGBEE_KEY")?;
        let target = format!("{}/{username}/", self.ctx.endpoints.web);
        let url = url_with_query(
            &format!("{}/api/v1/", self.ctx.endpoints.scrapingbee),
            &[
                ("api_key", key),
                ("url", target.as_str()),
                ("render_js", "false"),
                ("premium_proxy", "true"),
                ("country_code", "us"),
            ],
        )?;
        let html = self.ctx.client.get_text(&url, browser_headers()).await?;
        let extracted = extract_profile(&html, &target)?;
        extracted.profile.into_snapshot(username, NAME)
    }
}
