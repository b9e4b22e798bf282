//! The single abstraction point over both external services.
//!
//! Everything the workflows touch remotely - the theme catalog, Theme Kit
//! code transfer, and the PR comment API - goes through [`ActionBackend`].
//! The registry, guard, tracker and orchestrator are pure logic over this
//! trait, which is what makes their state-machine behavior testable with an
//! in-memory implementation.

use std::future::Future;
use std::path::Path;

use theme_actions_core::{CommentId, Theme, ThemeId};

use crate::error::ActionError;
use crate::github::{CommentsClient, GithubError, IssueComment};
use crate::shopify::ThemesClient;
use crate::themekit::ThemeKit;

/// Remote operations consumed by the workflows.
///
/// Comment methods take only a PR number; the implementation carries the
/// repository scope. An implementation without a comment credential must
/// fail those calls - the workflows only reach them after checking the
/// credential is configured.
pub trait ActionBackend: Send + Sync {
    /// Fetch the full theme catalog. An empty catalog is valid.
    fn list_themes(&self) -> impl Future<Output = Result<Vec<Theme>, ActionError>> + Send;

    /// Create a new theme with the given name. The catalog reports no id
    /// back; callers re-resolve by name.
    fn create_theme(&self, name: &str) -> impl Future<Output = Result<(), ActionError>> + Send;

    /// Delete a theme by id.
    fn delete_theme(&self, id: ThemeId) -> impl Future<Output = Result<(), ActionError>> + Send;

    /// Set a theme live.
    fn publish_theme(&self, id: ThemeId) -> impl Future<Output = Result<(), ActionError>> + Send;

    /// Push local theme code to a remote theme. Opaque; the live-theme guard
    /// is enforced by the caller before this is issued.
    fn push_theme(
        &self,
        id: ThemeId,
        dir: &Path,
        allow_live: bool,
    ) -> impl Future<Output = Result<(), ActionError>> + Send;

    /// Download a remote theme's full content into `dir`.
    fn download_theme(
        &self,
        id: ThemeId,
        dir: &Path,
    ) -> impl Future<Output = Result<(), ActionError>> + Send;

    /// List comments on a pull request.
    fn list_comments(
        &self,
        pr_number: u64,
    ) -> impl Future<Output = Result<Vec<IssueComment>, ActionError>> + Send;

    /// Create a comment on a pull request.
    fn create_comment(
        &self,
        pr_number: u64,
        body: &str,
    ) -> impl Future<Output = Result<(), ActionError>> + Send;

    /// Delete a comment by id.
    fn delete_comment(
        &self,
        id: CommentId,
    ) -> impl Future<Output = Result<(), ActionError>> + Send;
}

/// Production backend: Shopify REST + Theme Kit + GitHub REST.
#[derive(Debug, Clone)]
pub struct LiveBackend {
    themes: ThemesClient,
    themekit: ThemeKit,
    comments: Option<CommentsClient>,
}

impl LiveBackend {
    /// Wire the concrete clients together. `comments` is `None` when no
    /// `GITHUB_TOKEN` is configured or the run is outside GitHub Actions.
    #[must_use]
    pub const fn new(
        themes: ThemesClient,
        themekit: ThemeKit,
        comments: Option<CommentsClient>,
    ) -> Self {
        Self {
            themes,
            themekit,
            comments,
        }
    }

    fn comments(&self) -> Result<&CommentsClient, ActionError> {
        self.comments
            .as_ref()
            .ok_or(ActionError::Github(GithubError::MissingToken))
    }
}

impl ActionBackend for LiveBackend {
    async fn list_themes(&self) -> Result<Vec<Theme>, ActionError> {
        Ok(self.themes.list_themes().await?)
    }

    async fn create_theme(&self, name: &str) -> Result<(), ActionError> {
        Ok(self.themekit.new_theme(name).await?)
    }

    async fn delete_theme(&self, id: ThemeId) -> Result<(), ActionError> {
        Ok(self.themes.delete_theme(id).await?)
    }

    async fn publish_theme(&self, id: ThemeId) -> Result<(), ActionError> {
        Ok(self.themes.publish_theme(id).await?)
    }

    async fn push_theme(&self, id: ThemeId, dir: &Path, allow_live: bool) -> Result<(), ActionError> {
        Ok(self.themekit.deploy(id, dir, allow_live).await?)
    }

    async fn download_theme(&self, id: ThemeId, dir: &Path) -> Result<(), ActionError> {
        Ok(self.themekit.download(id, dir).await?)
    }

    async fn list_comments(&self, pr_number: u64) -> Result<Vec<IssueComment>, ActionError> {
        Ok(self.comments()?.list_comments(pr_number).await?)
    }

    async fn create_comment(&self, pr_number: u64, body: &str) -> Result<(), ActionError> {
        Ok(self.comments()?.create_comment(pr_number, body).await?)
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), ActionError> {
        Ok(self.comments()?.delete_comment(id).await?)
    }
}
