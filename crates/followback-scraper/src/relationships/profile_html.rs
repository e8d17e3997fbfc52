use async_trait::async_trait;
use followback_core::{ProfileSnapshot, RelationshipEntry};

use crate::client::browser_headers;
use crate::error::SourceError;
use crate::extract::extract_relationship_lists;
use crate::sources::SourceContext;
use crate::types::ListUser;

use super::{ListPaging, RelationshipLists, RelationshipSource};

const NAME: &str = "profile_html";

/// Last resort: the follower and followee nodes some profile pages embed in
/// their state blobs. Only ever a small sample, never paginated.
pub struct ProfileHtmlSource {
    ctx: SourceContext,
    paging: ListPaging,
}

impl ProfileHtmlSource {
    pub(crate) fn new(ctx: SourceContext, paging: ListPaging) -> Self {
        Self { ctx, paging }
    }

    fn entries(&self, users: Vec<ListUser>) -> Vec<RelationshipEntry> {
        users
            .into_iter()
            .filter_map(ListUser::into_entry)
            .take(self.paging.limits.max_items)
            .collect()
    }
}

#[async_trait]
impl RelationshipSource for ProfileHtmlSource {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch_lists(&self, profile: &ProfileSnapshot) -> Result<RelationshipLists, SourceError> {
        let url = format!("{}/{}/", self.ctx.endpoints.web, profile.username);
        let html = self.ctx.client.get_text(&url, browser_headers()).await?;
        let lists = extract_relationship_lists(&html).ok_or_else(|| {
            SourceError::NoStrategyMatched {
                context: format!("embedded follower lists in {url}"),
            }
        })?;
        tracing::debug!(
            source = NAME,
            followers = lists.followers.len(),
            following = lists.following.len(),
            "embedded lists found"
        );
        Ok(RelationshipLists {
            followers: self.entries(lists.followers),
            following: self.entries(lists.following),
        })
    }
}
