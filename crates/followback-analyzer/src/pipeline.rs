//! The `analyze(username)` pipeline.

use std::sync::Arc;
use std::time::Duration;

use followback_core::{AnalysisResult, AppConfig, Username};
use followback_scraper::{
    default_profile_sources, default_relationship_sources, ProfileSource, RelationshipSource,
    ScraperSettings, SourceError,
};

use crate::cache::ResultCache;
use crate::error::AnalyzeError;
use crate::estimate::estimate;
use crate::orchestrator::SourceChain;
use crate::resolver::RelationshipResolver;

/// Timing and cache knobs for [`Analyzer`].
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerSettings {
    pub source_timeout: Duration,
    pub deadline: Duration,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
}

impl AnalyzerSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            source_timeout: Duration::from_secs(config.source_timeout_secs),
            deadline: Duration::from_secs(config.deadline_secs),
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
            cache_capacity: config.cache_capacity,
        }
    }
}

pub struct Analyzer {
    profiles: SourceChain,
    relationships: RelationshipResolver,
    cache: ResultCache,
    deadline: Duration,
}

impl Analyzer {
    #[must_use]
    pub fn new(
        profile_sources: Vec<Box<dyn ProfileSource>>,
        relationship_sources: Vec<Box<dyn RelationshipSource>>,
        settings: AnalyzerSettings,
    ) -> Self {
        Self {
            profiles: SourceChain::new(profile_sources, settings.source_timeout),
            relationships: RelationshipResolver::new(relationship_sources, settings.source_timeout),
            cache: ResultCache::new(settings.cache_ttl, settings.cache_capacity),
            deadline: settings.deadline,
        }
    }

    /// Wires the default adapter lists against one shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        let scraper = ScraperSettings::from_app_config(config);
        let client = Arc::new(scraper.build_client()?);
        Ok(Self::new(
            default_profile_sources(Arc::clone(&client), &scraper),
            default_relationship_sources(client, &scraper),
            AnalyzerSettings::from_app_config(config),
        ))
    }

    /// Normalizes and validates `raw`, then returns a cached result or runs
    /// the fallback chain under the global deadline.
    ///
    /// Every terminal path yields real, profile-only, or estimated data; the
    /// result is cached whichever it is.
    ///
    /// # Errors
    ///
    /// [`AnalyzeError::Validation`] before any upstream call is made, or
    /// [`AnalyzeError::Timeout`] when the deadline fires. Partial work is
    /// discarded on timeout and nothing is cached.
    pub async fn analyze(&self, raw: &str) -> Result<AnalysisResult, AnalyzeError> {
        let username = Username::parse(raw)?;

        if let Some(hit) = self.cache.get(&username).await {
            tracing::debug!(username = %username, "cache hit");
            return Ok(hit);
        }

        let result = tokio::time::timeout(self.deadline, self.resolve(&username))
            .await
            .map_err(|_| {
                tracing::warn!(
                    username = %username,
                    deadline_secs = self.deadline.as_secs(),
                    "analysis deadline exceeded"
                );
                AnalyzeError::Timeout {
                    secs: self.deadline.as_secs(),
                }
            })?;

        tracing::info!(
            username = %username,
            data_source = %result.data_source,
            not_following_back = result.not_following_back_count,
            "analysis complete"
        );
        self.cache.put(&username, result.clone()).await;
        Ok(result)
    }

    async fn resolve(&self, username: &Username) -> AnalysisResult {
        match self.profiles.first_profile(username).await {
            Some(profile) => self.relationships.resolve(profile).await,
            None => {
                tracing::info!(username = %username, "no real data, falling back to estimation");
                estimate(username)
            }
        }
    }

    pub async fn cache_entries(&self) -> usize {
        self.cache.len().await
    }

    #[must_use]
    pub fn profile_source_names(&self) -> Vec<&'static str> {
        self.profiles.names()
    }

    #[must_use]
    pub fn relationship_source_names(&self) -> Vec<&'static str> {
        self.relationships.names()
    }
}
