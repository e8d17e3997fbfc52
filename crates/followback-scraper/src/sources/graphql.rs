use async_trait::async_trait;
use followback_core::{ProfileSnapshot, Username};

use crate::client::xhr_headers;
use crate::error::SourceError;
use crate::types::{RawProfile, WebProfileResponse};

use super::{ProfileSource, SourceContext};

const NAME: &str = "graphql";

/// Persisted query returning a user's profile by username.
const PROFILE_QUERY_HASH: &str = "c9100bf9110dd6361671f113dd02e7d6";

/// Anonymous POST to the public GraphQL endpoint. The response uses the
/// same `data.user` envelope as `web_profile_info`.
pub struct GraphqlSource {
    ctx: SourceContext,
}

impl GraphqlSource {
    pub(crate) fn new(ctx: SourceContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ProfileSource for GraphqlSource {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch_profile(&self, username: &Username) -> Result<ProfileSnapshot, SourceError> {
        let web = &self.ctx.endpoints.web;
        let url = format!("{web}/graphql/query/");
        let variables = serde_json::json!({ "username": username.as_str(), "first": 1 }).to_string();
        let form = [("query_hash", PROFILE_QUERY_HASH), ("variables", variables.as_str())];

        let response: WebProfileResponse = self
            .ctx
            .client
            .post_form_json(&url, xhr_headers(web, None), &form)
            .await?;
        let raw = response
            .data
            .and_then(|d| d.user)
            .map(RawProfile::from)
            .unwrap_or_default();
        raw.into_snapshot(username, NAME)
    }
}
