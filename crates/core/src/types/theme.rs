//! Shopify theme wire types.
//!
//! Mirrors the shape returned by the Admin REST `themes.json` endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ThemeId;

/// The role a theme plays in a store.
///
/// At most one theme per store has the [`ThemeRole::Main`] role at any time -
/// that theme serves the production storefront. This crate never constructs a
/// `main` role itself; it only reads it back to detect the live theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeRole {
    /// The live/production theme.
    Main,
    /// A theme not currently serving the storefront.
    Unpublished,
    /// A demo theme installed from the theme store.
    Demo,
}

/// A theme as reported by the store's theme catalog.
///
/// `name` is limited to 150 characters by Shopify and serves as the natural
/// key for lookups, since the catalog offers no query-by-name endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Unique id assigned by Shopify; never reused.
    pub id: ThemeId,
    /// Theme store listing id, if the theme was installed from the store.
    pub theme_store_id: Option<u64>,
    /// Theme name (max 150 characters).
    pub name: String,
    /// Role within the store.
    pub role: ThemeRole,
    /// Whether the theme can currently be previewed.
    #[serde(default)]
    pub previewable: bool,
    /// Whether Shopify is still processing the theme upload.
    #[serde(default)]
    pub processing: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Theme {
    /// Whether this theme is currently serving the production storefront.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.role == ThemeRole::Main
    }
}
