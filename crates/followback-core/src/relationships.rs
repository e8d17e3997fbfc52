//! Set arithmetic over follower/following lists.

use std::collections::HashSet;

use crate::types::RelationshipEntry;

/// Derived follow-back metrics for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowMetrics {
    pub not_following_back_count: u64,
    pub percent_not_following_back: u8,
    pub follow_back_rate: u8,
}

impl FollowMetrics {
    /// Computes metrics from a not-following-back count and the number of
    /// accounts analyzed.
    ///
    /// The percentage is rounded half-up and `follow_back_rate` is its
    /// complement, so the two always sum to 100 when `following > 0`.
    /// A zero `following` yields all-zero metrics.
    #[must_use]
    pub fn compute(not_following_back: u64, following: u64) -> Self {
        if following == 0 {
            return Self::zeroed();
        }
        let nfb = not_following_back.min(following);
        // round(100 * nfb / following) without floats
        let percent = (200 * nfb + following) / (2 * following);
        let percent = u8::try_from(percent.min(100)).unwrap_or(100);
        Self {
            not_following_back_count: nfb,
            percent_not_following_back: percent,
            follow_back_rate: 100 - percent,
        }
    }

    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            not_following_back_count: 0,
            percent_not_following_back: 0,
            follow_back_rate: 0,
        }
    }
}

/// Entries in `following` whose username does not appear in `followers`,
/// in `following` order, without duplicates.
#[must_use]
pub fn not_following_back(
    followers: &[RelationshipEntry],
    following: &[RelationshipEntry],
) -> Vec<RelationshipEntry> {
    let follower_names: HashSet<&str> = followers.iter().map(|e| e.username.as_str()).collect();
    let mut seen = HashSet::new();
    following
        .iter()
        .filter(|e| !follower_names.contains(e.username.as_str()))
        .filter(|e| seen.insert(e.username.as_str()))
        .cloned()
        .collect()
}

/// Drops later entries that repeat an earlier username.
#[must_use]
pub fn dedupe_by_username(entries: Vec<RelationshipEntry>) -> Vec<RelationshipEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.username.clone()))
        .collect()
}
