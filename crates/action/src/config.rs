//! Action configuration loaded from environment variables.
//!
//! GitHub Actions delivers inputs as `INPUT_<NAME>` environment variables, so
//! `ACTION` arrives as `INPUT_ACTION` and so on.
//!
//! # Inputs
//!
//! ## Required
//! - `ACTION` - `DEPLOYMENT_PREVIEW`, `DEPLOY` or `REMOVE_DEPLOYMENT_PREVIEW_THEME`
//! - `SHOPIFY_STORE_URL` - store host (e.g. your-store.myshopify.com)
//! - `SHOPIFY_API_KEY` - private app API key
//! - `SHOPIFY_PASSWORD` - private app password
//! - `SHOPIFY_THEME_DIRECTORY` - local directory holding the theme code
//!
//! ## Optional
//! - `SHOPIFY_THEME_ID` - explicit target theme for `DEPLOY`
//! - `SHOPIFY_ALLOW_LIVE_THEME_DEPLOYMENT` - disables the live-theme guard
//! - `SHOPIFY_THEME_KIT_FLAGS` - `FLAG=VALUE,FLAG=VALUE` passed through to Theme Kit
//! - `SHOPIFY_API_VERSION` - Admin API version (default: 2021-04)
//! - `GITHUB_TOKEN` - enables comment read/write/delete on the pull request

use std::env;
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use theme_actions_core::{ActionKind, ThemeId};

const DEFAULT_API_VERSION: &str = "2021-04";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing input: {0}")]
    MissingInput(String),
    #[error("Invalid input {0}: {1}")]
    InvalidInput(String, String),
}

/// Validated action configuration, constructed once per invocation and
/// passed by reference to every component. There are no process-wide
/// mutable singletons; all credentials live here.
#[derive(Debug, Clone)]
pub struct ActionConfig {
    /// Which workflow to run.
    pub action: ActionKind,
    /// Store credentials and API version.
    pub shopify: ShopifyConfig,
    /// Explicit target theme for `DEPLOY`.
    pub theme_id: Option<ThemeId>,
    /// Local directory holding the theme code to deploy.
    pub theme_dir: PathBuf,
    /// Disables the live-theme guard when true.
    pub allow_live: bool,
    /// Extra `--flag=value` pairs passed through to Theme Kit.
    pub themekit_flags: Vec<(String, String)>,
    /// Comment-posting credential; commenting is skipped when absent.
    pub github_token: Option<SecretString>,
}

/// Shopify store credentials.
///
/// Implements `Debug` manually to redact the API key and password.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Store host, e.g. your-store.myshopify.com.
    pub store_url: String,
    /// Private app API key.
    pub api_key: SecretString,
    /// Private app password.
    pub password: SecretString,
    /// Admin API version segment.
    pub api_version: String,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store_url", &self.store_url)
            .field("api_key", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl ActionConfig {
    /// Load configuration from `INPUT_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required input is missing or an input does
    /// not parse. No remote call is attempted before this succeeds.
    pub fn from_env() -> Result<Self, ConfigError> {
        let action = get_required_input("ACTION")?
            .parse::<ActionKind>()
            .map_err(|e| ConfigError::InvalidInput("ACTION".to_string(), e.to_string()))?;

        let shopify = ShopifyConfig {
            store_url: get_required_input("SHOPIFY_STORE_URL")?,
            api_key: SecretString::from(get_required_input("SHOPIFY_API_KEY")?),
            password: SecretString::from(get_required_input("SHOPIFY_PASSWORD")?),
            api_version: get_input("SHOPIFY_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        };

        let theme_id = get_input("SHOPIFY_THEME_ID")
            .map(|raw| {
                raw.parse::<u64>().map(ThemeId::new).map_err(|e| {
                    ConfigError::InvalidInput("SHOPIFY_THEME_ID".to_string(), e.to_string())
                })
            })
            .transpose()?;

        let theme_dir = PathBuf::from(get_required_input("SHOPIFY_THEME_DIRECTORY")?);

        let allow_live = get_input("SHOPIFY_ALLOW_LIVE_THEME_DEPLOYMENT")
            .is_some_and(|raw| parse_bool(&raw));

        let themekit_flags = match get_input("SHOPIFY_THEME_KIT_FLAGS") {
            Some(raw) => parse_flag_pairs(&raw)?,
            None => Vec::new(),
        };

        let github_token = get_input("GITHUB_TOKEN").map(SecretString::from);

        Ok(Self {
            action,
            shopify,
            theme_id,
            theme_dir,
            allow_live,
            themekit_flags,
            github_token,
        })
    }
}

/// Read an action input, treating an empty or whitespace-only value as unset
/// (GitHub Actions passes unset inputs as empty strings).
fn get_input(name: &str) -> Option<String> {
    let value = env::var(format!("INPUT_{name}")).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn get_required_input(name: &str) -> Result<String, ConfigError> {
    get_input(name).ok_or_else(|| ConfigError::MissingInput(name.to_string()))
}

/// Booleans accept `true`/`1`/`yes`, case-insensitively.
fn parse_bool(raw: &str) -> bool {
    matches!(raw.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

/// Parse a `FLAG=VALUE,FLAG=VALUE` passthrough string into ordered pairs.
///
/// # Errors
///
/// Returns `ConfigError::InvalidInput` when an entry has no `=` separator.
pub fn parse_flag_pairs(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| {
            entry.split_once('=').map_or_else(
                || {
                    Err(ConfigError::InvalidInput(
                        "SHOPIFY_THEME_KIT_FLAGS".to_string(),
                        format!("entry '{entry}' is not of the form FLAG=VALUE"),
                    ))
                },
                |(key, value)| Ok((key.trim().to_string(), value.trim().to_string())),
            )
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_pairs_two_flags() {
        let flags = parse_flag_pairs("test=213,team=two").unwrap();
        assert_eq!(
            flags,
            vec![
                ("test".to_string(), "213".to_string()),
                ("team".to_string(), "two".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_flag_pairs_empty_string() {
        assert!(parse_flag_pairs("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_flag_pairs_missing_separator() {
        let err = parse_flag_pairs("noIgnore").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInput(_, _)));
        assert!(err.to_string().contains("noIgnore"));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("1"));
        assert!(parse_bool("yes"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("nope"));
    }

    #[test]
    fn test_shopify_config_debug_redacts_secrets() {
        let config = ShopifyConfig {
            store_url: "test.myshopify.com".to_string(),
            api_key: SecretString::from("key-abc123"),
            password: SecretString::from("pw-def456"),
            api_version: DEFAULT_API_VERSION.to_string(),
        };
        let rendered = format!("{config:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("key-abc123"));
        assert!(!rendered.contains("pw-def456"));
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::MissingInput("SHOPIFY_STORE_URL".to_string()).to_string(),
            "Missing input: SHOPIFY_STORE_URL"
        );
    }
}
