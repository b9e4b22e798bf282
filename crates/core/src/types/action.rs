//! Action selector.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Which workflow the action runs for this CI event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Create or find the per-PR preview theme and deploy to it.
    DeploymentPreview,
    /// Deploy to an explicitly configured theme id.
    Deploy,
    /// Delete the preview theme recorded in the PR's marker comment.
    RemoveDeploymentPreviewTheme,
}

/// The `ACTION` input did not name a known workflow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unknown ACTION '{0}' (expected DEPLOYMENT_PREVIEW, DEPLOY or REMOVE_DEPLOYMENT_PREVIEW_THEME)"
)]
pub struct ActionKindParseError(pub String);

impl FromStr for ActionKind {
    type Err = ActionKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPLOYMENT_PREVIEW" => Ok(Self::DeploymentPreview),
            "DEPLOY" => Ok(Self::Deploy),
            "REMOVE_DEPLOYMENT_PREVIEW_THEME" => Ok(Self::RemoveDeploymentPreviewTheme),
            other => Err(ActionKindParseError(other.to_string())),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DeploymentPreview => "DEPLOYMENT_PREVIEW",
            Self::Deploy => "DEPLOY",
            Self::RemoveDeploymentPreviewTheme => "REMOVE_DEPLOYMENT_PREVIEW_THEME",
        };
        f.write_str(name)
    }
}

impl ActionKind {
    /// Whether this action deploys theme code (as opposed to tearing down).
    #[must_use]
    pub const fn is_deployment(self) -> bool {
        matches!(self, Self::DeploymentPreview | Self::Deploy)
    }
}
