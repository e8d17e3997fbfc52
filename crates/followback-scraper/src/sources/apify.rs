use async_trait::async_trait;
use followback_core::{ProfileSnapshot, Username};
use serde::Deserialize;

use crate::error::SourceError;
use crate::types::{string_or_number, RawProfile};

use super::hosted::bearer_headers;
use super::{require_credential, ProfileSource, SourceContext};

const NAME: &str = "apify";

const ACTOR: &str = "apify~instagram-profile-scraper";

/// Dataset item of the profile scraper actor. Older actor versions emit
/// snake_case Instagram field names, sometimes next to the camelCase ones,
/// so each spelling is a separate field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApifyProfileItem {
    #[serde(default, deserialize_with = "string_or_number")]
    id: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default, rename = "full_name")]
    full_name_snake: Option<String>,
    #[serde(default)]
    biography: Option<String>,
    #[serde(default)]
    private: Option<bool>,
    #[serde(default, rename = "is_private")]
    is_private: Option<bool>,
    #[serde(default)]
    followers_count: Option<u64>,
    #[serde(default, rename = "follower_count")]
    follower_count: Option<u64>,
    #[serde(default)]
    follows_count: Option<u64>,
    #[serde(default, rename = "following_count")]
    following_count: Option<u64>,
    #[serde(default)]
    posts_count: Option<u64>,
    #[serde(default, rename = "media_count")]
    media_count: Option<u64>,
    #[serde(default)]
    profile_pic_url: Option<String>,
    #[serde(default, rename = "profile_pic_url")]
    profile_pic_url_snake: Option<String>,
    #[serde(default)]
    external_url: Option<String>,
    #[serde(default, rename = "external_url")]
    external_url_snake: Option<String>,
}

impl From<ApifyProfileItem> for RawProfile {
    fn from(item: ApifyProfileItem) -> Self {
        Self {
            username: item.username,
            full_name: item.full_name.or(item.full_name_snake),
            biography: item.biography,
            avatar_url: item.profile_pic_url.or(item.profile_pic_url_snake),
            external_url: item.external_url.or(item.external_url_snake),
            is_private: item.private.or(item.is_private),
            followers: item.followers_count.or(item.follower_count),
            following: item.follows_count.or(item.following_count),
            posts: item.posts_count.or(item.media_count),
            internal_user_id: item.id,
        }
    }
}

/// Runs the Apify Instagram profile scraper synchronously and reads its
/// dataset. Requires `APIFY_TOKEN`.
pub struct ApifySource {
    ctx: SourceContext,
    token: Option<String>,
}

impl ApifySource {
    pub(crate) fn new(ctx: SourceContext, token: Option<String>) -> Self {
        Self { ctx, token }
    }
}

#[async_trait]
impl ProfileSource for ApifySource {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_available(&self) -> bool {
        self.token.is_some()
    }

    async fn fetch_profile(&self, username: &Username) -> Result<ProfileSnapshot, SourceError> {
        let token = require_credential(NAME, self.token.as_deref(), "APIFY_TOKEN")?;
        let url = format!(
            "{}/v2/acts/{ACTOR}/run-sync-get-dataset-items",
            self.ctx.endpoints.apify
        );
        let body = serde_json::json!({ "usernames": [username.as_str()] });
        let items: Vec<ApifyProfileItem> = self
            .ctx
            .client
            .post_json(&url, bearer_headers(NAME, token)?, &body)
            .await?;

        items
            .into_iter()
            .find(|item| {
                item.username
                    .as_deref()
                    .is_some_and(|u| u.eq_ignore_ascii_case(username.as_str()))
            })
            .map(RawProfile::from)
            .unwrap_or_default()
            .into_snapshot(username, NAME)
    }
}
