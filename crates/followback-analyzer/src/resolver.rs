//! Relationship Resolver: lists for a resolved profile, or a profile-only
//! result when no list adapter produces anything.

use std::time::Duration;

use followback_core::{AnalysisResult, ProfileSnapshot};
use followback_scraper::RelationshipSource;

use crate::orchestrator::{call_with_timeout, log_source_failure};

pub struct RelationshipResolver {
    sources: Vec<Box<dyn RelationshipSource>>,
    per_source_timeout: Duration,
}

impl RelationshipResolver {
    #[must_use]
    pub fn new(sources: Vec<Box<dyn RelationshipSource>>, per_source_timeout: Duration) -> Self {
        Self {
            sources,
            per_source_timeout,
        }
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Tries the list adapters in order. The first one returning at least
    /// one entry yields a `real` result; an empty success is treated like a
    /// failure and the next adapter is tried. Never fails: exhaustion
    /// degrades to [`AnalysisResult::profile_only`].
    pub async fn resolve(&self, profile: ProfileSnapshot) -> AnalysisResult {
        for source in &self.sources {
            let name = source.name();
            if !source.is_available() {
                tracing::debug!(source = name, username = %profile.username, "list source unavailable, skipping");
                continue;
            }

            match call_with_timeout(name, self.per_source_timeout, source.fetch_lists(&profile))
                .await
            {
                Ok(lists) if lists.is_empty() => {
                    tracing::debug!(source = name, username = %profile.username, "list source returned no entries");
                }
                Ok(lists) => {
                    tracing::info!(
                        source = name,
                        username = %profile.username,
                        followers = lists.followers.len(),
                        following = lists.following.len(),
                        "relationship lists resolved"
                    );
                    return AnalysisResult::from_lists(profile, lists.followers, lists.following);
                }
                Err(e) => log_source_failure(name, &profile.username, &e),
            }
        }

        tracing::info!(username = %profile.username, "no relationship lists, returning profile only");
        AnalysisResult::profile_only(profile)
    }
}
