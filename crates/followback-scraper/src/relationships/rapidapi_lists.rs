use async_trait::async_trait;
use followback_core::{ProfileSnapshot, RelationshipEntry};

use crate::error::SourceError;
use crate::sources::rapidapi::fetch_user_info;
use crate::sources::SourceContext;
use crate::types::ListUser;

use super::{ListPaging, RelationshipLists, RelationshipSource};

const NAME: &str = "rapidapi_lists";

/// Lists bundled in the RapidAPI `userinfo` response. Single request, no
/// cursor; the item cap still applies. Requires `RAPIDAPI_KEY`.
pub struct RapidApiListsSource {
    ctx: SourceContext,
    paging: ListPaging,
    key: Option<String>,
}

impl RapidApiListsSource {
    pub(crate) fn new(ctx: SourceContext, paging: ListPaging, key: Option<String>) -> Self {
        Self { ctx, paging, key }
    }

    fn entries(&self, users: Option<Vec<ListUser>>) -> Vec<RelationshipEntry> {
        users
            .unwrap_or_default()
            .into_iter()
            .filter_map(ListUser::into_entry)
            .take(self.paging.limits.max_items)
            .collect()
    }
}

#[async_trait]
impl RelationshipSource for RapidApiListsSource {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_available(&self) -> bool {
        self.key.is_some()
    }

    async fn fetch_lists(&self, profile: &ProfileSnapshot) -> Result<RelationshipLists, SourceError> {
        let key = self
            .key
            .as_deref()
            .ok_or_else(|| SourceError::unavailable(NAME, "RAPIDAPI_KEY not configured"))?;
        let response = fetch_user_info(&self.ctx, key, &profile.username).await?;
        Ok(RelationshipLists {
            followers: self.entries(response.followers),
            following: self.entries(response.following),
        })
    }
}
