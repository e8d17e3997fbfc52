use async_trait::async_trait;
use followback_core::{ProfileSnapshot, Username};

use crate::client::{bootstrap_session, browser_headers, headers::apply_session};
use crate::error::SourceError;
use crate::extract::extract_profile;

use super::{ProfileSource, SourceContext};

const NAME: &str = "profile_page";

/// Scrapes `{web}/{username}/` with the ordered extraction strategies.
pub struct ProfilePageSource {
    ctx: SourceContext,
}

impl ProfilePageSource {
    pub(crate) fn new(ctx: SourceContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ProfileSource for ProfilePageSource {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch_profile(&self, username: &Username) -> Result<ProfileSnapshot, SourceError> {
        let web = &self.ctx.endpoints.web;
        let mut headers = browser_headers();
        if let Some(session) = bootstrap_session(&self.ctx.client, web).await {
            apply_session(&mut headers, &session);
        }

        let url = format!("{web}/{username}/");
        let html = self.ctx.client.get_text(&url, headers).await?;
        let extracted = extract_profile(&html, &url)?;
        extracted.profile.into_snapshot(username, NAME)
    }
}
