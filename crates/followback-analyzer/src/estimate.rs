//! Estimation Fallback.
//!
//! Synthesizes a result from the username alone when no real data could be
//! obtained. Deterministic: the same username always produces the same
//! result. Every estimate is tagged [`DataSource::RealisticEstimation`] and
//! carries an explanatory message.

use followback_core::{
    AnalysisResult, AnalysisSummary, DataSource, ExternalLinks, FollowMetrics, ProfileSnapshot,
    RelationshipEntry, Username,
};

const SAMPLE_SIZE: u64 = 20;

pub const ESTIMATION_MESSAGE: &str = "Realistic estimation based on username characteristics \
     (Real Instagram data unavailable due to API restrictions)";

/// Account archetype guessed from the shape of the username.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    Celebrity,
    Brand,
    Personal,
    Default,
}

struct Ranges {
    followers: (u64, u64),
    following: (u64, u64),
    posts: (u64, u64),
}

impl Archetype {
    /// First matching rule wins: short letters-only names, then brand
    /// keywords, then personal keywords or long names.
    #[must_use]
    pub fn classify(username: &str) -> Self {
        let len = username.chars().count();
        if len <= 8 && username.chars().all(|c| c.is_ascii_alphabetic()) {
            Self::Celebrity
        } else if ["official", "brand", "company"]
            .iter()
            .any(|k| username.contains(k))
        {
            Self::Brand
        } else if username.contains("user") || username.contains("person") || len > 10 {
            Self::Personal
        } else {
            Self::Default
        }
    }

    // (modulus, offset) per count
    fn ranges(self) -> Ranges {
        match self {
            Self::Celebrity => Ranges {
                followers: (1_000_000, 50_000),
                following: (1_000, 100),
                posts: (1_000, 50),
            },
            Self::Brand => Ranges {
                followers: (100_000, 5_000),
                following: (500, 50),
                posts: (500, 20),
            },
            Self::Personal => Ranges {
                followers: (10_000, 500),
                following: (1_000, 200),
                posts: (200, 10),
            },
            Self::Default => Ranges {
                followers: (50_000, 1_000),
                following: (2_000, 100),
                posts: (500, 10),
            },
        }
    }
}

fn username_hash(username: &str) -> u64 {
    username.chars().map(u64::from).sum()
}

fn capitalize(username: &str) -> String {
    let mut chars = username.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn initial(username: &str) -> String {
    username
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

fn sample(prefix: &str, label: &str, color: &str, count: u64) -> Vec<RelationshipEntry> {
    (1..=count.min(SAMPLE_SIZE))
        .map(|i| {
            let username = format!("{prefix}_{i}");
            let display = format!("{label} {i}");
            let avatar = format!(
                "https://via.placeholder.com/150/{color}/FFFFFF?text={}{i}",
                &label[..1]
            );
            RelationshipEntry::new(&username, Some(&display), Some(&avatar))
        })
        .collect()
}

/// Builds the estimated result for `username`.
///
/// `notFollowingBackCount` is `floor(following * 0.35)`. The sample lists
/// hold at most 20 entries; the not-following-back sample is drawn from the
/// following sample so it stays a subset of it.
#[must_use]
pub fn estimate(username: &Username) -> AnalysisResult {
    let name = username.as_str();
    let hash = username_hash(name);
    let archetype = Archetype::classify(name);
    let ranges = archetype.ranges();
    let pick = |(modulus, offset): (u64, u64)| hash % modulus + offset;

    let followers_count = pick(ranges.followers);
    let following_count = pick(ranges.following);
    let posts_count = pick(ranges.posts);
    let not_following_back_count = following_count * 35 / 100;
    let metrics = FollowMetrics::compute(not_following_back_count, following_count);

    tracing::debug!(
        username = name,
        ?archetype,
        followers_count,
        following_count,
        "generated estimation"
    );

    let followers = sample("follower", "Follower", "FF6B6B", followers_count);
    let following = sample("following", "Following", "4ECDC4", following_count);
    let not_following_back: Vec<RelationshipEntry> = following
        .iter()
        .take(usize::try_from(not_following_back_count.min(SAMPLE_SIZE)).unwrap_or(0))
        .cloned()
        .collect();

    let profile = ProfileSnapshot {
        username: name.to_owned(),
        is_public: true,
        display_name: capitalize(name),
        bio: format!("Instagram user {name} - Realistic estimation based on username characteristics"),
        avatar_url: format!(
            "https://via.placeholder.com/150/667eea/FFFFFF?text={}",
            initial(name)
        ),
        website_url: String::new(),
        posts_count,
        followers_count,
        following_count,
        internal_user_id: None,
    };

    AnalysisResult {
        external_links: ExternalLinks::for_username(name),
        profile,
        followers,
        following,
        not_following_back,
        not_following_back_count: metrics.not_following_back_count,
        percent_not_following_back: metrics.percent_not_following_back,
        follow_back_rate: metrics.follow_back_rate,
        data_source: DataSource::RealisticEstimation,
        message: Some(ESTIMATION_MESSAGE.to_owned()),
        analysis: AnalysisSummary {
            total_analyzed: following_count,
            mutual_followers: following_count - metrics.not_following_back_count,
            non_followers: metrics.not_following_back_count,
            follow_back_rate: metrics.follow_back_rate,
        },
    }
}

#[cfg(test)]
#[path = "estimate_test.rs"]
mod tests;
