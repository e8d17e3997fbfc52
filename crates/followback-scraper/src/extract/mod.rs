//! Profile extraction from Instagram HTML.
//!
//! Tries strategies in priority order (structured script JSON, legacy
//! embedded state, `edge_*` count fields, flat count fields, meta
//! description, loose numeric fields) and returns the first one that yields
//! any of followers/following/posts. Later strategies are not attempted.

mod embedded;
mod meta;
mod patterns;

pub(crate) use patterns::capture_grouped_count;

use crate::error::SourceError;
use crate::types::{ListUser, RawProfile};

/// One way of pulling profile counts out of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ScriptJson,
    SharedData,
    EdgeCounts,
    CountFields,
    MetaDescription,
    LooseNumeric,
}

impl Strategy {
    pub const ORDERED: [Strategy; 6] = [
        Strategy::ScriptJson,
        Strategy::SharedData,
        Strategy::EdgeCounts,
        Strategy::CountFields,
        Strategy::MetaDescription,
        Strategy::LooseNumeric,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ScriptJson => "script_json",
            Self::SharedData => "shared_data",
            Self::EdgeCounts => "edge_counts",
            Self::CountFields => "count_fields",
            Self::MetaDescription => "meta_description",
            Self::LooseNumeric => "loose_numeric",
        }
    }

    /// Runs this strategy alone. `None` means it found no count.
    #[must_use]
    pub fn apply(self, html: &str) -> Option<RawProfile> {
        let raw = match self {
            Self::ScriptJson => embedded::from_script_json(html),
            Self::SharedData => embedded::from_shared_data(html),
            Self::EdgeCounts => patterns::edge_counts(html).map(|r| r.or(patterns::details(html))),
            Self::CountFields => {
                patterns::count_fields(html).map(|r| r.or(patterns::details(html)))
            }
            Self::MetaDescription => {
                meta::from_meta_description(html).map(|r| r.or(patterns::details(html)))
            }
            Self::LooseNumeric => {
                patterns::loose_numeric(html).map(|r| r.or(patterns::details(html)))
            }
        }?;
        raw.has_any_count().then_some(raw)
    }
}

/// Result of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub strategy: Strategy,
    pub profile: RawProfile,
}

/// Runs [`Strategy::ORDERED`] against `html`.
///
/// # Errors
///
/// [`SourceError::NoStrategyMatched`] when no strategy yields a count.
pub fn extract_profile(html: &str, context: &str) -> Result<Extracted, SourceError> {
    for strategy in Strategy::ORDERED {
        if let Some(profile) = strategy.apply(html) {
            tracing::debug!(context, strategy = strategy.name(), "extraction strategy matched");
            return Ok(Extracted { strategy, profile });
        }
    }
    Err(SourceError::NoStrategyMatched {
        context: context.to_owned(),
    })
}

/// Follower/following nodes some profile pages embed next to the counts.
#[derive(Debug, Default)]
pub struct EmbeddedLists {
    pub followers: Vec<ListUser>,
    pub following: Vec<ListUser>,
}

/// Reads `edge_followed_by.edges` / `edge_follow.edges` from the page's
/// embedded state. `None` when no blob carries a non-empty list.
#[must_use]
pub fn extract_relationship_lists(html: &str) -> Option<EmbeddedLists> {
    embedded::relationship_lists(html)
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
