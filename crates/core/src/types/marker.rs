//! Marker-comment codec.
//!
//! The action has no durable store of its own, so the preview theme id is
//! persisted inside a pull-request comment as a pair of hidden HTML comments:
//!
//! ```text
//! <!-- {marker} --><!-- Shopify Theme ID {id} -->{visible message}
//! ```
//!
//! The marker identifies comments owned by this action; the theme id tag is
//! what teardown reads back. Encode and decode live together here so the
//! grammar stays in one place.

use std::sync::LazyLock;

use regex::Regex;

use super::id::ThemeId;

/// Matches the hidden theme id tag. The id is a base-10 integer with no
/// leading sign and no extra whitespace inside the tag.
static THEME_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!-- Shopify Theme ID (\d+) -->").expect("theme id pattern is valid")
});

/// Build a marker comment body embedding the hidden marker and theme id tag
/// ahead of the visible message.
#[must_use]
pub fn encode_marker_comment(marker: &str, theme_id: ThemeId, message: &str) -> String {
    format!("<!-- {marker} --><!-- Shopify Theme ID {theme_id} -->{message}")
}

/// Whether a comment body contains the hidden marker.
#[must_use]
pub fn contains_marker(body: &str, marker: &str) -> bool {
    body.contains(marker)
}

/// Extract the theme id from a marker comment body.
///
/// Returns `None` when the tag is absent or does not parse - callers treat
/// that as a soft condition ("nothing to tear down"), never an error.
#[must_use]
pub fn extract_theme_id(body: &str) -> Option<ThemeId> {
    let captures = THEME_ID_RE.captures(body)?;
    captures.get(1)?.as_str().parse::<u64>().ok().map(ThemeId::new)
}
