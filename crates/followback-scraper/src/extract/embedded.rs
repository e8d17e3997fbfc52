//! JSON embedded in `<script>` tags.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::types::{InstagramUser, ListUser, RawProfile};

use super::EmbeddedLists;

static SCRIPT_JSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type="application/json"[^>]*>(.*?)</script>"#)
        .expect("valid regex")
});

static SHARED_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)window\._sharedData\s*=\s*(\{.*?\})\s*;\s*</script>").expect("valid regex")
});

static ADDITIONAL_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)window\.__additionalDataLoaded\s*\(\s*'[^']*'\s*,\s*(\{.*?\})\s*\)\s*;")
        .expect("valid regex")
});

/// Nesting depth searched for a user object. Real payloads nest it well
/// under this.
const MAX_SEARCH_DEPTH: usize = 24;

pub(super) fn from_script_json(html: &str) -> Option<RawProfile> {
    SCRIPT_JSON_RE
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .filter_map(|m| serde_json::from_str::<Value>(m.as_str().trim()).ok())
        .find_map(|v| user_profile_in(&v))
}

pub(super) fn from_shared_data(html: &str) -> Option<RawProfile> {
    [&*SHARED_DATA_RE, &*ADDITIONAL_DATA_RE]
        .into_iter()
        .filter_map(|re| re.captures(html))
        .filter_map(|c| c.get(1))
        .filter_map(|m| serde_json::from_str::<Value>(m.as_str()).ok())
        .find_map(|v| user_profile_in(&v))
}

#[derive(Debug, Default, Deserialize)]
struct EdgeNode {
    #[serde(default)]
    node: ListUser,
}

#[derive(Debug, Default, Deserialize)]
struct EdgeList {
    #[serde(default)]
    edges: Vec<EdgeNode>,
}

/// The list-bearing parts of a user object. Older profile pages shipped the
/// first few followers and followees alongside the counts.
#[derive(Debug, Default, Deserialize)]
struct UserEdges {
    #[serde(default)]
    edge_followed_by: Option<EdgeList>,
    #[serde(default)]
    edge_follow: Option<EdgeList>,
}

/// Follower and following nodes from any embedded state blob, first blob
/// with a non-empty list wins.
pub(super) fn relationship_lists(html: &str) -> Option<EmbeddedLists> {
    let shared = [&*SHARED_DATA_RE, &*ADDITIONAL_DATA_RE]
        .into_iter()
        .filter_map(|re| re.captures(html))
        .filter_map(|c| c.get(1));
    let scripts = SCRIPT_JSON_RE.captures_iter(html).filter_map(|c| c.get(1));

    shared
        .chain(scripts)
        .filter_map(|m| serde_json::from_str::<Value>(m.as_str().trim()).ok())
        .find_map(|v| lists_in(&v))
}

fn lists_in(value: &Value) -> Option<EmbeddedLists> {
    let edges = serde_json::from_value::<UserEdges>(find_user(value, 0)?.clone()).ok()?;
    let nodes = |list: Option<EdgeList>| -> Vec<ListUser> {
        list.map(|l| l.edges.into_iter().map(|e| e.node).collect())
            .unwrap_or_default()
    };
    let lists = EmbeddedLists {
        followers: nodes(edges.edge_followed_by),
        following: nodes(edges.edge_follow),
    };
    (!lists.followers.is_empty() || !lists.following.is_empty()).then_some(lists)
}

/// Depth-first search for the first object that looks like a user with counts.
fn user_profile_in(value: &Value) -> Option<RawProfile> {
    find_user(value, 0)
        .and_then(|obj| serde_json::from_value::<InstagramUser>(obj.clone()).ok())
        .map(RawProfile::from)
        .filter(RawProfile::has_any_count)
}

fn find_user(value: &Value, depth: usize) -> Option<&Value> {
    if depth > MAX_SEARCH_DEPTH {
        return None;
    }
    match value {
        Value::Object(map) => {
            if map.contains_key("edge_followed_by") || map.contains_key("follower_count") {
                return Some(value);
            }
            map.values().find_map(|v| find_user(v, depth + 1))
        }
        Value::Array(items) => items.iter().find_map(|v| find_user(v, depth + 1)),
        _ => None,
    }
}
