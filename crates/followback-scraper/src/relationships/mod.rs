//! Follower/following list adapters.
//!
//! Each adapter paginates through its provider under [`PaginationLimits`],
//! so a provider that never stops handing out cursors still terminates.

mod basic_display;
mod friendships;
mod graph_api;
mod profile_html;
mod rapidapi_lists;

use std::sync::Arc;

use async_trait::async_trait;
use followback_core::{ProfileSnapshot, RelationshipEntry};

use crate::client::InstagramClient;
use crate::error::SourceError;
use crate::pagination::PaginationLimits;
use crate::sources::{ScraperSettings, SourceContext};

pub use basic_display::BasicDisplaySource;
pub use friendships::FriendshipsSource;
pub use graph_api::GraphApiSource;
pub use profile_html::ProfileHtmlSource;
pub use rapidapi_lists::RapidApiListsSource;

/// Both lists for one account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipLists {
    pub followers: Vec<RelationshipEntry>,
    pub following: Vec<RelationshipEntry>,
}

impl RelationshipLists {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.followers.is_empty() && self.following.is_empty()
    }
}

#[async_trait]
pub trait RelationshipSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool {
        true
    }

    /// # Errors
    ///
    /// A [`SourceError`] classified by [`SourceError::kind`].
    async fn fetch_lists(&self, profile: &ProfileSnapshot)
        -> Result<RelationshipLists, SourceError>;
}

/// Paging configuration shared by the list adapters.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ListPaging {
    pub page_size: u32,
    pub limits: PaginationLimits,
}

/// All relationship adapters in priority order.
#[must_use]
pub fn default_relationship_sources(
    client: Arc<InstagramClient>,
    settings: &ScraperSettings,
) -> Vec<Box<dyn RelationshipSource>> {
    let ctx = SourceContext {
        client,
        endpoints: Arc::new(settings.endpoints.clone()),
    };
    let paging = ListPaging {
        page_size: settings.page_size,
        limits: settings.pagination,
    };
    let creds = &settings.credentials;
    vec![
        Box::new(GraphApiSource::new(
            ctx.clone(),
            paging,
            creds.instagram_access_token.clone(),
        )),
        Box::new(BasicDisplaySource::new(
            ctx.clone(),
            paging,
            creds.instagram_access_token.clone(),
        )),
        Box::new(RapidApiListsSource::new(
            ctx.clone(),
            paging,
            creds.rapidapi_key.clone(),
        )),
        Box::new(FriendshipsSource::new(ctx.clone(), paging)),
        Box::new(ProfileHtmlSource::new(ctx, paging)),
    ]
}

/// Rejects a token whose owner is not the account being analyzed; the
/// token-scoped APIs can only list the owner's relationships.
pub(crate) fn ensure_token_owner(
    source_name: &'static str,
    owner: Option<&str>,
    profile: &ProfileSnapshot,
) -> Result<(), SourceError> {
    match owner {
        Some(owner) if owner.eq_ignore_ascii_case(&profile.username) => Ok(()),
        Some(owner) => Err(SourceError::unavailable(
            source_name,
            format!("access token belongs to @{owner}, not @{}", profile.username),
        )),
        None => Ok(()),
    }
}
