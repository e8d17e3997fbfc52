//! Fallback Orchestrator: ordered profile adapters, first valid snapshot wins.

use std::future::Future;
use std::time::Duration;

use followback_core::{ProfileSnapshot, Username};
use followback_scraper::{FailureKind, ProfileSource, SourceError};

/// Ordered profile adapters invoked one at a time under a per-call timeout.
pub struct SourceChain {
    sources: Vec<Box<dyn ProfileSource>>,
    per_source_timeout: Duration,
}

impl SourceChain {
    #[must_use]
    pub fn new(sources: Vec<Box<dyn ProfileSource>>, per_source_timeout: Duration) -> Self {
        Self {
            sources,
            per_source_timeout,
        }
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Returns the first snapshot produced by an available adapter, or `None`
    /// once every adapter has been tried. Adapters after the winner are never
    /// called.
    pub async fn first_profile(&self, username: &Username) -> Option<ProfileSnapshot> {
        for source in &self.sources {
            let name = source.name();
            if !source.is_available() {
                tracing::debug!(source = name, username = %username, "source unavailable, skipping");
                continue;
            }

            match call_with_timeout(name, self.per_source_timeout, source.fetch_profile(username))
                .await
            {
                Ok(profile) => {
                    tracing::info!(
                        source = name,
                        username = %username,
                        followers = profile.followers_count,
                        following = profile.following_count,
                        "profile resolved"
                    );
                    return Some(profile);
                }
                Err(e) => log_source_failure(name, username.as_str(), &e),
            }
        }

        tracing::warn!(username = %username, "every profile source failed");
        None
    }
}

/// Bounds one adapter invocation, mapping an elapsed timer to
/// [`SourceError::Timeout`]. The abandoned future is dropped.
pub(crate) async fn call_with_timeout<T, F>(
    source_name: &'static str,
    timeout: Duration,
    call: F,
) -> Result<T, SourceError>
where
    F: Future<Output = Result<T, SourceError>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or_else(|_| {
            Err(SourceError::Timeout {
                source_name,
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            })
        })
}

pub(crate) fn log_source_failure(source_name: &'static str, username: &str, err: &SourceError) {
    let kind = err.kind();
    if kind == FailureKind::Unavailable {
        tracing::debug!(source = source_name, username, %kind, error = %err, "source unavailable");
    } else {
        tracing::warn!(source = source_name, username, %kind, error = %err, "source failed");
    }
}
