use std::sync::LazyLock;

use regex::Regex;

use crate::types::RawProfile;

// content="1,234 Followers, 56 Following, 78 Posts - See Instagram photos..."
static META_COUNTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)content\s*=\s*.([\d.,]+[KM]?)\s+Followers,\s*([\d.,]+[KM]?)\s+Following,\s*([\d.,]+[KM]?)\s+Posts",
    )
    .expect("valid regex")
});

pub(super) fn from_meta_description(html: &str) -> Option<RawProfile> {
    let caps = META_COUNTS_RE.captures(html)?;
    let raw = RawProfile {
        followers: caps.get(1).and_then(|m| parse_abbreviated(m.as_str())),
        following: caps.get(2).and_then(|m| parse_abbreviated(m.as_str())),
        posts: caps.get(3).and_then(|m| parse_abbreviated(m.as_str())),
        ..RawProfile::default()
    };
    raw.has_any_count().then_some(raw)
}

/// Parses `"1,234"`, `"12.5K"`, `"3M"` into a count.
pub(super) fn parse_abbreviated(text: &str) -> Option<u64> {
    let text = text.trim().replace(',', "");
    let (number, multiplier) = match text.chars().last()? {
        'k' | 'K' => (&text[..text.len() - 1], 1_000.0),
        'm' | 'M' => (&text[..text.len() - 1], 1_000_000.0),
        _ => (text.as_str(), 1.0),
    };
    let value: f64 = number.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some((value * multiplier).round() as u64)
}
