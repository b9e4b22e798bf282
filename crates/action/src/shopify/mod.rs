//! Shopify Admin REST client for the theme catalog.
//!
//! This module provides:
//! - [`ThemesClient`] for listing, deleting and publishing themes
//! - [`preview_url`] for building a theme preview link
//!
//! Theme creation and code transfer go through Theme Kit instead (see
//! [`crate::themekit`]) because the command-based path is what provisions a
//! theme's initial file set; the REST catalog is used wherever a JSON view of
//! the store is needed.

mod client;

pub use client::ThemesClient;

use thiserror::Error;

use theme_actions_core::ThemeId;

/// Errors that can occur when talking to the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("Shopify request failed: {0}")]
    Request(String),

    /// Failed to parse the response body.
    #[error("Shopify response error: {0}")]
    Response(String),

    /// Shopify returned a non-success status.
    #[error("Shopify API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },
}

/// Build the preview URL for a theme.
///
/// Deterministic from the store host and theme id; issues no remote call.
#[must_use]
pub fn preview_url(store_url: &str, theme_id: ThemeId) -> String {
    format!("https://{store_url}/?preview_theme_id={theme_id}")
}
