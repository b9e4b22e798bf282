//! Shopify Admin REST API client.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use theme_actions_core::{Theme, ThemeId};

use super::{ShopifyError, preview_url};
use crate::config::ShopifyConfig;

/// Wire shape of `GET themes.json`.
#[derive(Debug, Deserialize)]
struct ThemesResponse {
    themes: Vec<Theme>,
}

/// Wire shape of `PUT themes/{id}.json` when publishing.
#[derive(Debug, Serialize)]
struct PublishRequest {
    theme: PublishTheme,
}

#[derive(Debug, Serialize)]
struct PublishTheme {
    id: ThemeId,
    role: &'static str,
}

/// Shopify Admin REST client scoped to the theme catalog.
///
/// Holds the store credentials for the lifetime of the invocation; every
/// call re-fetches from the remote catalog (no caching - consecutive calls
/// can observe different snapshots of an eventually-consistent catalog).
#[derive(Clone)]
pub struct ThemesClient {
    client: Client,
    store_url: String,
    api_version: String,
    api_key: SecretString,
    password: SecretString,
}

impl std::fmt::Debug for ThemesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemesClient")
            .field("store_url", &self.store_url)
            .field("api_version", &self.api_version)
            .field("api_key", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl ThemesClient {
    /// Create a new client from the store configuration.
    #[must_use]
    pub fn new(config: &ShopifyConfig) -> Self {
        Self {
            client: Client::new(),
            store_url: config.store_url.clone(),
            api_version: config.api_version.clone(),
            api_key: config.api_key.clone(),
            password: config.password.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "https://{}/admin/api/{}/{path}",
            self.store_url, self.api_version
        )
    }

    /// Fetch the full theme catalog for the store.
    ///
    /// An empty catalog is a valid result, not an error.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response does not parse.
    #[instrument(skip(self), fields(store = %self.store_url))]
    pub async fn list_themes(&self) -> Result<Vec<Theme>, ShopifyError> {
        let response = self
            .client
            .get(self.endpoint("themes.json"))
            .basic_auth(self.api_key.expose_secret(), Some(self.password.expose_secret()))
            .send()
            .await
            .map_err(|e| ShopifyError::Request(e.to_string()))?;

        let response = check_status(response).await?;
        let body: ThemesResponse = response
            .json()
            .await
            .map_err(|e| ShopifyError::Response(e.to_string()))?;

        debug!(count = body.themes.len(), "Fetched theme catalog");
        Ok(body.themes)
    }

    /// Delete a theme by id.
    ///
    /// Whether deleting an unknown id is an error is decided by Shopify, not
    /// re-validated here.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or Shopify rejects the deletion.
    #[instrument(skip(self), fields(store = %self.store_url, theme_id = %theme_id))]
    pub async fn delete_theme(&self, theme_id: ThemeId) -> Result<(), ShopifyError> {
        let response = self
            .client
            .delete(self.endpoint(&format!("themes/{theme_id}.json")))
            .basic_auth(self.api_key.expose_secret(), Some(self.password.expose_secret()))
            .send()
            .await
            .map_err(|e| ShopifyError::Request(e.to_string()))?;

        check_status(response).await?;
        debug!("Theme deleted");
        Ok(())
    }

    /// Set a theme live by assigning it the `main` role.
    ///
    /// Shopify unpublishes the previously live theme as a side effect, which
    /// is how the one-live-theme invariant is maintained remotely.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or Shopify rejects the publish.
    #[instrument(skip(self), fields(store = %self.store_url, theme_id = %theme_id))]
    pub async fn publish_theme(&self, theme_id: ThemeId) -> Result<(), ShopifyError> {
        let request = PublishRequest {
            theme: PublishTheme {
                id: theme_id,
                role: "main",
            },
        };

        let response = self
            .client
            .put(self.endpoint(&format!("themes/{theme_id}.json")))
            .basic_auth(self.api_key.expose_secret(), Some(self.password.expose_secret()))
            .json(&request)
            .send()
            .await
            .map_err(|e| ShopifyError::Request(e.to_string()))?;

        check_status(response).await?;
        debug!("Theme published");
        Ok(())
    }

    /// Build the preview URL for a theme on this store.
    #[must_use]
    pub fn preview_url(&self, theme_id: ThemeId) -> String {
        preview_url(&self.store_url, theme_id)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ShopifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ShopifyError::Api {
        status: status.as_u16(),
        body,
    })
}
