//! Third-party statistics pages that publish follower counts in their HTML.

use std::sync::LazyLock;

use async_trait::async_trait;
use followback_core::{ProfileSnapshot, Username};
use regex::Regex;

use crate::client::browser_headers;
use crate::error::SourceError;
use crate::extract::capture_grouped_count;
use crate::types::RawProfile;

use super::{ProfileSource, SourceContext};

static SOCIALBLADE_FOLLOWERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Followers\s*</div>\s*<div[^>]*>\s*([\d,]+)").expect("valid regex")
});

static SOCIALBLADE_FOLLOWING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Following\s*</div>\s*<div[^>]*>\s*([\d,]+)").expect("valid regex")
});

static SOCIALBLADE_MEDIA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Media\s+Uploads\s*</div>\s*<div[^>]*>\s*([\d,]+)").expect("valid regex")
});

static HYPEAUDITOR_FOLLOWERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""followers"\s*:\s*(\d+)"#).expect("valid regex"));

static HYPEAUDITOR_FOLLOWING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""following"\s*:\s*(\d+)"#).expect("valid regex"));

fn scraped_counts(
    html: &str,
    followers: &Regex,
    following: &Regex,
    posts: Option<&Regex>,
) -> RawProfile {
    RawProfile {
        followers: capture_grouped_count(followers, html),
        following: capture_grouped_count(following, html),
        posts: posts.and_then(|re| capture_grouped_count(re, html)),
        ..RawProfile::default()
    }
}

/// SocialBlade's monthly statistics page.
pub struct SocialBladeSource {
    ctx: SourceContext,
}

impl SocialBladeSource {
    const NAME: &'static str = "socialblade";

    pub(crate) fn new(ctx: SourceContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ProfileSource for SocialBladeSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch_profile(&self, username: &Username) -> Result<ProfileSnapshot, SourceError> {
        let url = format!(
            "{}/instagram/user/{username}/monthly",
            self.ctx.endpoints.socialblade
        );
        let html = self.ctx.client.get_text(&url, browser_headers()).await?;
        scraped_counts(
            &html,
            &SOCIALBLADE_FOLLOWERS_RE,
            &SOCIALBLADE_FOLLOWING_RE,
            Some(&SOCIALBLADE_MEDIA_RE),
        )
        .into_snapshot(username, Self::NAME)
    }
}

/// HypeAuditor's public report page.
pub struct HypeAuditorSource {
    ctx: SourceContext,
}

impl HypeAuditorSource {
    const NAME: &'static str = "hypeauditor";

    pub(crate) fn new(ctx: SourceContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ProfileSource for HypeAuditorSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch_profile(&self, username: &Username) -> Result<ProfileSnapshot, SourceError> {
        let url = format!("{}/instagram/{username}", self.ctx.endpoints.hypeauditor);
        let html = self.ctx.client.get_text(&url, browser_headers()).await?;
        scraped_counts(
            &html,
            &HYPEAUDITOR_FOLLOWERS_RE,
            &HYPEAUDITOR_FOLLOWING_RE,
            None,
        )
        .into_snapshot(username, Self::NAME)
    }
}
