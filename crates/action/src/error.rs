//! Unified error handling for the action.
//!
//! Every fatal condition funnels into [`ActionError`]; `main` converts it to
//! a single `::error::` workflow command and a non-zero exit. Soft conditions
//! (no PR in scope, no token, marker comment already gone) are absorbed with
//! a log line at their component boundary and never reach this type.

use thiserror::Error;

use theme_actions_core::ThemeId;

use crate::config::ConfigError;
use crate::github::GithubError;
use crate::shopify::ShopifyError;
use crate::themekit::ThemeKitError;

/// Top-level error type for the action.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Invalid or missing action inputs.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Shopify theme catalog call failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// GitHub comment API call failed.
    #[error("GitHub error: {0}")]
    Github(#[from] GithubError),

    /// Theme Kit command failed.
    #[error("Theme Kit error: {0}")]
    ThemeKit(#[from] ThemeKitError),

    /// The catalog accepted a create but a follow-up lookup found nothing.
    /// Not retried; the remote catalog is not behaving as assumed.
    #[error(
        "Shopify theme with name '{name}' should have been created and the theme found in \
         Shopify however the theme cannot be found in Shopify."
    )]
    ThemeCreationInconsistency {
        /// The theme name that was created but never became visible.
        name: String,
    },

    /// Deploy targeted the live theme without the explicit override.
    #[error(
        "refusing to deploy to theme {id} because it is the live theme; set \
         'SHOPIFY_ALLOW_LIVE_THEME_DEPLOYMENT' to deploy to the live theme anyway"
    )]
    LiveThemeGuard {
        /// The live theme that would have been overwritten.
        id: ThemeId,
    },

    /// `DEPLOY` ran without a resolved theme id.
    #[error(
        "'shopifyThemeId' is not set but is required in order to deploy the theme to Shopify \
         (if using the 'DEPLOY' action make sure to set 'SHOPIFY_THEME_ID')."
    )]
    MissingThemeId,

    /// Teardown requires a comment-posting credential.
    #[error("Cannot remove deployment preview theme as 'GITHUB_TOKEN' is not set.")]
    MissingGithubToken,

    /// Teardown requires a pull-request context.
    #[error("Cannot remove deployment preview theme as job is not running from within a pull request.")]
    NotInPullRequest,

    /// Preview deployments are named after the pull request number.
    #[error("Cannot create a deployment preview as job is not running from within a pull request.")]
    PreviewRequiresPullRequest,

    /// Local I/O failed (theme directory, `GITHUB_OUTPUT`, temp dir).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_theme_id_message_matches_action_docs() {
        assert!(
            ActionError::MissingThemeId
                .to_string()
                .contains("make sure to set 'SHOPIFY_THEME_ID'")
        );
    }

    #[test]
    fn test_live_guard_names_override_input() {
        let err = ActionError::LiveThemeGuard {
            id: ThemeId::new(7),
        };
        assert!(err.to_string().contains("SHOPIFY_ALLOW_LIVE_THEME_DEPLOYMENT"));
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn test_inconsistency_names_theme() {
        let err = ActionError::ThemeCreationInconsistency {
            name: "PR 12 - deployment preview".to_string(),
        };
        assert!(err.to_string().contains("'PR 12 - deployment preview'"));
    }
}
