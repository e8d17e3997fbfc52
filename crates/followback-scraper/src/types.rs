//! Upstream response shapes and the intermediate [`RawProfile`].
//!
//! ## Observed shape of `web_profile_info`
//!
//! ```text
//! { "data": { "user": {
//!     "id": "25025320", "username": "...", "full_name": "...",
//!     "biography": "...", "profile_pic_url_hd": "...", "external_url": null,
//!     "is_private": false,
//!     "edge_followed_by": { "count": 1234 },
//!     "edge_follow": { "count": 56 },
//!     "edge_owner_to_timeline_media": { "count": 78 } } } }
//! ```
//!
//! The mobile API and several embedded-state blobs use the same user object,
//! sometimes with flat `follower_count` / `following_count` / `media_count`
//! fields instead of the `edge_*` wrappers, and with a numeric `pk` instead of
//! a string `id`. Every field is optional: a missing nested field degrades to
//! "unknown" rather than failing the whole parse.

use followback_core::{ProfileSnapshot, Username};
use serde::{Deserialize, Deserializer};

use crate::error::SourceError;

#[derive(Debug, Default, Deserialize)]
pub struct WebProfileResponse {
    #[serde(default)]
    pub data: Option<WebProfileData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebProfileData {
    #[serde(default)]
    pub user: Option<InstagramUser>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EdgeCount {
    #[serde(default)]
    pub count: Option<u64>,
}

/// Instagram's user object as it appears across endpoints and embedded state.
#[derive(Debug, Default, Deserialize)]
pub struct InstagramUser {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub pk: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
    #[serde(default)]
    pub profile_pic_url_hd: Option<String>,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub is_private: Option<bool>,
    #[serde(default)]
    pub edge_followed_by: Option<EdgeCount>,
    #[serde(default)]
    pub edge_follow: Option<EdgeCount>,
    #[serde(default)]
    pub edge_owner_to_timeline_media: Option<EdgeCount>,
    #[serde(default)]
    pub follower_count: Option<u64>,
    #[serde(default)]
    pub following_count: Option<u64>,
    #[serde(default)]
    pub media_count: Option<u64>,
}

impl From<InstagramUser> for RawProfile {
    fn from(user: InstagramUser) -> Self {
        Self {
            username: user.username,
            full_name: user.full_name,
            biography: user.biography,
            avatar_url: user.profile_pic_url_hd.or(user.profile_pic_url),
            external_url: user.external_url,
            is_private: user.is_private,
            followers: user
                .edge_followed_by
                .and_then(|e| e.count)
                .or(user.follower_count),
            following: user.edge_follow.and_then(|e| e.count).or(user.following_count),
            posts: user
                .edge_owner_to_timeline_media
                .and_then(|e| e.count)
                .or(user.media_count),
            internal_user_id: user.id.or(user.pk),
        }
    }
}

/// Accepts `"123"`, `123`, or `null`.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Profile fields as scraped, before validation.
///
/// Counts stay `None` when the upstream did not report them, so "absent"
/// and "zero" remain distinguishable until [`RawProfile::into_snapshot`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProfile {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub biography: Option<String>,
    pub avatar_url: Option<String>,
    pub external_url: Option<String>,
    pub is_private: Option<bool>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
    pub posts: Option<u64>,
    pub internal_user_id: Option<String>,
}

impl RawProfile {
    #[must_use]
    pub fn has_any_count(&self) -> bool {
        self.followers.is_some() || self.following.is_some() || self.posts.is_some()
    }

    /// Fills fields still unset from `other`.
    #[must_use]
    pub fn or(self, other: RawProfile) -> Self {
        Self {
            username: self.username.or(other.username),
            full_name: self.full_name.or(other.full_name),
            biography: self.biography.or(other.biography),
            avatar_url: self.avatar_url.or(other.avatar_url),
            external_url: self.external_url.or(other.external_url),
            is_private: self.is_private.or(other.is_private),
            followers: self.followers.or(other.followers),
            following: self.following.or(other.following),
            posts: self.posts.or(other.posts),
            internal_user_id: self.internal_user_id.or(other.internal_user_id),
        }
    }

    /// Validates and normalizes into a [`ProfileSnapshot`].
    ///
    /// The snapshot always carries the requested username; upstream echoes
    /// are ignored.
    ///
    /// # Errors
    ///
    /// [`SourceError::MissingCounts`] when neither followers nor following
    /// was reported.
    pub fn into_snapshot(
        self,
        username: &Username,
        source_name: &'static str,
    ) -> Result<ProfileSnapshot, SourceError> {
        if self.followers.is_none() && self.following.is_none() {
            return Err(SourceError::MissingCounts { source_name });
        }
        let display_name = self
            .full_name
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| username.as_str().to_owned());
        Ok(ProfileSnapshot {
            username: username.as_str().to_owned(),
            is_public: !self.is_private.unwrap_or(false),
            display_name,
            bio: self.biography.unwrap_or_default(),
            avatar_url: self.avatar_url.unwrap_or_default(),
            website_url: self.external_url.unwrap_or_default(),
            posts_count: self.posts.unwrap_or(0),
            followers_count: self.followers.unwrap_or(0),
            following_count: self.following.unwrap_or(0),
            internal_user_id: self.internal_user_id,
        })
    }
}

/// A user as it appears inside followers/following list responses.
///
/// Graph API uses `name` / `profile_picture_url`, the legacy API uses
/// `full_name` / `profile_picture`, the mobile API `full_name` /
/// `profile_pic_url`.
///
/// Providers sometimes send several spellings at once, so each one is its own
/// field and [`ListUser::into_entry`] picks the first present.
#[derive(Debug, Default, Deserialize)]
pub struct ListUser {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl ListUser {
    /// Converts to an entry; users without a username are dropped.
    #[must_use]
    pub fn into_entry(self) -> Option<followback_core::RelationshipEntry> {
        let username = self.username.filter(|u| !u.trim().is_empty())?;
        let full_name = self.full_name.or(self.name);
        let avatar = self
            .profile_pic_url
            .or(self.profile_picture_url)
            .or(self.profile_picture);
        Some(followback_core::RelationshipEntry::new(
            username.trim(),
            full_name.as_deref(),
            avatar.as_deref(),
        ))
    }
}
