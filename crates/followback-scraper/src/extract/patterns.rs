//! Regex extraction over raw page text.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::RawProfile;

macro_rules! lazy_re {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect("valid regex"));
    };
}

lazy_re!(EDGE_FOLLOWED_BY_RE, r#""edge_followed_by"\s*:\s*\{\s*"count"\s*:\s*(\d+)"#);
lazy_re!(EDGE_FOLLOW_RE, r#""edge_follow"\s*:\s*\{\s*"count"\s*:\s*(\d+)"#);
lazy_re!(EDGE_MEDIA_RE, r#""edge_owner_to_timeline_media"\s*:\s*\{\s*"count"\s*:\s*(\d+)"#);

lazy_re!(FOLLOWER_COUNT_RE, r#""followers?_count"\s*:\s*(\d+)"#);
lazy_re!(FOLLOWING_COUNT_RE, r#""following_count"\s*:\s*(\d+)"#);
lazy_re!(MEDIA_COUNT_RE, r#""media_count"\s*:\s*(\d+)"#);

lazy_re!(LOOSE_FOLLOWERS_RE, r#""followers"\s*:\s*(\d+)"#);
lazy_re!(LOOSE_FOLLOWING_RE, r#""following"\s*:\s*(\d+)"#);
lazy_re!(LOOSE_POSTS_RE, r#""posts"\s*:\s*(\d+)"#);

lazy_re!(FULL_NAME_RE, r#""full_name"\s*:\s*"((?:[^"\\]|\\.)*)""#);
lazy_re!(BIOGRAPHY_RE, r#""biography"\s*:\s*"((?:[^"\\]|\\.)*)""#);
lazy_re!(IS_PRIVATE_RE, r#""is_private"\s*:\s*(true|false)"#);
lazy_re!(PROFILE_PIC_RE, r#""profile_pic_url(?:_hd)?"\s*:\s*"((?:[^"\\]|\\.)*)""#);
lazy_re!(EXTERNAL_URL_RE, r#""external_url"\s*:\s*"((?:[^"\\]|\\.)*)""#);
lazy_re!(PROFILE_PAGE_ID_RE, r#""profilePage_(\d+)""#);

fn capture_u64(re: &Regex, text: &str) -> Option<u64> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Captures a JSON string literal body and decodes its escapes.
fn capture_json_string(re: &Regex, text: &str) -> Option<String> {
    let body = re.captures(text)?.get(1)?.as_str();
    serde_json::from_str::<String>(&format!("\"{body}\""))
        .ok()
        .filter(|s| !s.is_empty())
}

fn counts(followers: &Regex, following: &Regex, posts: &Regex, html: &str) -> Option<RawProfile> {
    let raw = RawProfile {
        followers: capture_u64(followers, html),
        following: capture_u64(following, html),
        posts: capture_u64(posts, html),
        ..RawProfile::default()
    };
    raw.has_any_count().then_some(raw)
}

pub(super) fn edge_counts(html: &str) -> Option<RawProfile> {
    counts(&EDGE_FOLLOWED_BY_RE, &EDGE_FOLLOW_RE, &EDGE_MEDIA_RE, html)
}

pub(super) fn count_fields(html: &str) -> Option<RawProfile> {
    counts(&FOLLOWER_COUNT_RE, &FOLLOWING_COUNT_RE, &MEDIA_COUNT_RE, html)
}

pub(super) fn loose_numeric(html: &str) -> Option<RawProfile> {
    counts(&LOOSE_FOLLOWERS_RE, &LOOSE_FOLLOWING_RE, &LOOSE_POSTS_RE, html)
}

/// Non-count profile fields, scraped independently of the count strategy.
pub(super) fn details(html: &str) -> RawProfile {
    RawProfile {
        full_name: capture_json_string(&FULL_NAME_RE, html),
        biography: capture_json_string(&BIOGRAPHY_RE, html),
        is_private: IS_PRIVATE_RE
            .captures(html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str() == "true"),
        avatar_url: capture_json_string(&PROFILE_PIC_RE, html),
        external_url: capture_json_string(&EXTERNAL_URL_RE, html),
        internal_user_id: PROFILE_PAGE_ID_RE
            .captures(html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_owned()),
        ..RawProfile::default()
    }
}

/// Runs `re` over `text` and parses the first capture as a count, accepting
/// thousands separators (`1,234`).
pub(crate) fn capture_grouped_count(re: &Regex, text: &str) -> Option<u64> {
    let digits: String = re
        .captures(text)?
        .get(1)?
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
