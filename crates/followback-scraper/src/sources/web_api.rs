use async_trait::async_trait;
use followback_core::{ProfileSnapshot, Username};

use crate::client::{bootstrap_session, xhr_headers};
use crate::error::SourceError;

use super::mobile_api::fetch_web_profile_info;
use super::{ProfileSource, SourceContext};

const NAME: &str = "web_api_session";

/// `web_profile_info` on the web host with cookies and CSRF token captured
/// from the landing page. A failed bootstrap still sends the request, just
/// without session headers.
pub struct WebApiSessionSource {
    ctx: SourceContext,
}

impl WebApiSessionSource {
    pub(crate) fn new(ctx: SourceContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ProfileSource for WebApiSessionSource {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch_profile(&self, username: &Username) -> Result<ProfileSnapshot, SourceError> {
        let web = &self.ctx.endpoints.web;
        let session = bootstrap_session(&self.ctx.client, web).await;
        let headers = xhr_headers(web, session.as_ref());
        let raw = fetch_web_profile_info(&self.ctx, web, headers, username.as_str()).await?;
        raw.into_snapshot(username, NAME)
    }
}
