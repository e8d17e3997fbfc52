use serde::{Deserialize, Serialize};

use crate::relationships::{dedupe_by_username, not_following_back, FollowMetrics};

const INSTAGRAM_PROFILE_BASE: &str = "https://instagram.com";

/// Normalized profile record, independent of which upstream produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    pub username: String,
    pub is_public: bool,
    pub display_name: String,
    pub bio: String,
    pub avatar_url: String,
    pub website_url: String,
    pub posts_count: u64,
    pub followers_count: u64,
    pub following_count: u64,
    /// Numeric account id, when the upstream exposes it. Needed by the
    /// friendships list endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_user_id: Option<String>,
}

/// One account in a followers/following list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEntry {
    pub username: String,
    pub display_name: String,
    pub avatar_url: String,
    pub profile_url: String,
}

impl RelationshipEntry {
    /// Builds an entry, defaulting the display name to the username.
    #[must_use]
    pub fn new(username: &str, display_name: Option<&str>, avatar_url: Option<&str>) -> Self {
        let display_name = display_name
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(username);
        Self {
            username: username.to_string(),
            display_name: display_name.to_string(),
            avatar_url: avatar_url.unwrap_or_default().to_string(),
            profile_url: format!("{INSTAGRAM_PROFILE_BASE}/{username}"),
        }
    }
}

/// Provenance tag carried by every result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Follower and following lists were retrieved and diffed.
    Real,
    /// Only the profile counts could be retrieved.
    ProfileOnly,
    /// Every real-data path failed; values are synthesized.
    RealisticEstimation,
}

impl DataSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::ProfileOnly => "profile_only",
            Self::RealisticEstimation => "realistic_estimation",
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total_analyzed: u64,
    pub mutual_followers: u64,
    pub non_followers: u64,
    pub follow_back_rate: u8,
}

/// Informational deep links to third-party analytics sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalLinks {
    pub instagram_profile: String,
    pub instagram_analytics: String,
    pub instagram_creator_studio: String,
    pub socialblade: String,
    pub hypeauditor: String,
}

impl ExternalLinks {
    #[must_use]
    pub fn for_username(username: &str) -> Self {
        Self {
            instagram_profile: format!("https://www.instagram.com/{username}/"),
            instagram_analytics: "https://business.instagram.com/insights/".to_string(),
            instagram_creator_studio: "https://business.facebook.com/creatorstudio/".to_string(),
            socialblade: format!("https://socialblade.com/instagram/user/{username}/monthly"),
            hypeauditor: format!("https://hypeauditor.com/instagram/{username}"),
        }
    }
}

/// Final output of one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub profile: ProfileSnapshot,
    pub followers: Vec<RelationshipEntry>,
    pub following: Vec<RelationshipEntry>,
    pub not_following_back: Vec<RelationshipEntry>,
    pub not_following_back_count: u64,
    pub percent_not_following_back: u8,
    pub follow_back_rate: u8,
    pub data_source: DataSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub analysis: AnalysisSummary,
    pub external_links: ExternalLinks,
}

impl AnalysisResult {
    /// Builds a `real` result by diffing the retrieved lists.
    ///
    /// Lists are deduplicated by username. The reported counts are raised to
    /// at least the list lengths so `notFollowingBackCount <= followingCount`
    /// holds even when the profile counts were stale.
    #[must_use]
    pub fn from_lists(
        profile: ProfileSnapshot,
        followers: Vec<RelationshipEntry>,
        following: Vec<RelationshipEntry>,
    ) -> Self {
        let followers = dedupe_by_username(followers);
        let following = dedupe_by_username(following);
        let not_following_back = not_following_back(&followers, &following);

        let analyzed = following.len() as u64;
        let metrics = FollowMetrics::compute(not_following_back.len() as u64, analyzed);

        let mut profile = profile;
        profile.followers_count = profile.followers_count.max(followers.len() as u64);
        profile.following_count = profile.following_count.max(analyzed);

        let external_links = ExternalLinks::for_username(&profile.username);
        Self {
            profile,
            followers,
            following,
            not_following_back,
            not_following_back_count: metrics.not_following_back_count,
            percent_not_following_back: metrics.percent_not_following_back,
            follow_back_rate: metrics.follow_back_rate,
            data_source: DataSource::Real,
            message: None,
            analysis: AnalysisSummary {
                total_analyzed: analyzed,
                mutual_followers: analyzed - metrics.not_following_back_count,
                non_followers: metrics.not_following_back_count,
                follow_back_rate: metrics.follow_back_rate,
            },
            external_links,
        }
    }

    /// Builds a `profile_only` result: empty lists, zeroed derived metrics.
    #[must_use]
    pub fn profile_only(profile: ProfileSnapshot) -> Self {
        let metrics = FollowMetrics::zeroed();
        let external_links = ExternalLinks::for_username(&profile.username);
        Self {
            profile,
            followers: Vec::new(),
            following: Vec::new(),
            not_following_back: Vec::new(),
            not_following_back_count: metrics.not_following_back_count,
            percent_not_following_back: metrics.percent_not_following_back,
            follow_back_rate: metrics.follow_back_rate,
            data_source: DataSource::ProfileOnly,
            message: Some(
                "Profile data only: follower and following lists could not be retrieved"
                    .to_string(),
            ),
            analysis: AnalysisSummary {
                total_analyzed: 0,
                mutual_followers: 0,
                non_followers: 0,
                follow_back_rate: metrics.follow_back_rate,
            },
            external_links,
        }
    }
}
