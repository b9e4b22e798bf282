//! Action orchestrator.
//!
//! Sequences the registry, the deploy guard and the comment tracker into one
//! of three workflows, selected by the `ACTION` input. Strictly sequential:
//! every step depends on data returned by its predecessor (the theme id, the
//! live status, the comment's presence), so there is nothing to parallelize
//! within an invocation.

use tracing::{info, warn};

use theme_actions_core::{ActionKind, ThemeId, extract_theme_id};

use crate::backend::ActionBackend;
use crate::comments;
use crate::config::ActionConfig;
use crate::deploy;
use crate::error::ActionError;
use crate::github::GithubContext;
use crate::registry;
use crate::shopify;

/// Hidden string identifying comments owned by this action.
pub const HIDDEN_COMMENT_MARKER: &str =
    "Comment created by GitHub Action `Shopify Theme Actions`";

/// Result variables published for downstream workflow steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutputs {
    /// The theme that was deployed to.
    pub theme_id: ThemeId,
    /// Preview URL for that theme.
    pub preview_url: String,
}

/// Run the workflow selected by the configuration.
///
/// Returns outputs for the deployment actions and `None` for teardown.
///
/// # Errors
///
/// Fatal conditions (configuration, guard violation, consistency failure,
/// remote call failure) bubble up unmodified; there is no partial-success
/// reporting - the selected workflow either completes or fails as a unit.
pub async fn run<B: ActionBackend>(
    backend: &B,
    config: &ActionConfig,
    context: Option<&GithubContext>,
) -> Result<Option<ActionOutputs>, ActionError> {
    match config.action {
        ActionKind::DeploymentPreview => deployment_preview(backend, config, context)
            .await
            .map(Some),
        ActionKind::Deploy => {
            let theme_id = config.theme_id.ok_or(ActionError::MissingThemeId)?;
            deployment(backend, config, context, theme_id).await.map(Some)
        }
        ActionKind::RemoveDeploymentPreviewTheme => {
            remove_deployment_preview_theme(backend, config, context)
                .await
                .map(|()| None)
        }
    }
}

/// Create or find the per-PR preview theme, then deploy to it.
async fn deployment_preview<B: ActionBackend>(
    backend: &B,
    config: &ActionConfig,
    context: Option<&GithubContext>,
) -> Result<ActionOutputs, ActionError> {
    let pr_number = context
        .and_then(|ctx| ctx.pr_number)
        .ok_or(ActionError::PreviewRequiresPullRequest)?;

    let theme_name = format!("PR {pr_number} - deployment preview");
    let resolved = registry::create_or_find_theme(backend, &theme_name).await?;
    info!(
        theme_id = %resolved.theme.id,
        preexisting = resolved.preexisting,
        "Resolved deployment preview theme"
    );

    deployment(backend, config, context, resolved.theme.id).await
}

/// Deploy to a known theme id and report the result.
async fn deployment<B: ActionBackend>(
    backend: &B,
    config: &ActionConfig,
    context: Option<&GithubContext>,
    theme_id: ThemeId,
) -> Result<ActionOutputs, ActionError> {
    deploy::deploy_theme(backend, theme_id, &config.theme_dir, config.allow_live).await?;

    let preview_url = shopify::preview_url(&config.shopify.store_url, theme_id);
    let message = format!(
        ":tada: Shopify theme has been deployed to theme id '{theme_id}' at '{}'. The theme \
         can be previewed at: {preview_url}",
        config.shopify.store_url
    );
    post_marker_comment(backend, config, context, theme_id, &message).await?;

    Ok(ActionOutputs {
        theme_id,
        preview_url,
    })
}

/// Persist the theme id to the PR via the marker comment, when possible.
///
/// Missing token or PR context makes this a no-op: commenting is best-effort
/// enrichment and never blocks a deploy.
async fn post_marker_comment<B: ActionBackend>(
    backend: &B,
    config: &ActionConfig,
    context: Option<&GithubContext>,
    theme_id: ThemeId,
    message: &str,
) -> Result<(), ActionError> {
    if config.github_token.is_none() {
        info!("No GITHUB_TOKEN configured, skipping PR comment");
        return Ok(());
    }
    let Some(pr_number) = context.and_then(|ctx| ctx.pr_number) else {
        info!("Not running within a pull request, skipping PR comment");
        return Ok(());
    };

    comments::replace_marker_comment(backend, pr_number, HIDDEN_COMMENT_MARKER, theme_id, message)
        .await
}

/// Delete the preview theme recorded in the PR's marker comment.
///
/// The marker comment itself is left in place, pointing at the deleted
/// theme id; only the theme is removed.
async fn remove_deployment_preview_theme<B: ActionBackend>(
    backend: &B,
    config: &ActionConfig,
    context: Option<&GithubContext>,
) -> Result<(), ActionError> {
    if config.github_token.is_none() {
        return Err(ActionError::MissingGithubToken);
    }
    let pr_number = context
        .and_then(|ctx| ctx.pr_number)
        .ok_or(ActionError::NotInPullRequest)?;

    let Some(comment) =
        comments::find_marker_comment(backend, pr_number, HIDDEN_COMMENT_MARKER).await?
    else {
        warn!("Cannot find the last deployment preview comment so no theme can be removed.");
        return Ok(());
    };

    let Some(theme_id) = comment.body.as_deref().and_then(extract_theme_id) else {
        warn!(
            comment_id = %comment.id,
            "Marker comment holds no parseable theme id, nothing to remove"
        );
        return Ok(());
    };

    info!(theme_id = %theme_id, "Removing deployment preview theme");
    backend.delete_theme(theme_id).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    use chrono::Utc;
    use secrecy::SecretString;

    use theme_actions_core::{CommentId, Theme, ThemeId, ThemeRole, contains_marker};

    use super::*;
    use crate::github::IssueComment;

    /// In-memory stand-in for both external services, recording every
    /// mutating call.
    #[derive(Default)]
    struct MockBackend {
        themes: Mutex<Vec<Theme>>,
        comments: Mutex<Vec<IssueComment>>,
        next_theme_id: AtomicU64,
        next_comment_id: AtomicU64,
        created_names: Mutex<Vec<String>>,
        pushes: Mutex<Vec<(ThemeId, PathBuf, bool)>>,
        downloads: Mutex<Vec<ThemeId>>,
        deleted_themes: Mutex<Vec<ThemeId>>,
        /// When set, creates are accepted but never become visible,
        /// simulating a catalog consistency failure.
        lose_creates: AtomicBool,
    }

    fn make_theme(id: u64, name: &str, role: ThemeRole) -> Theme {
        Theme {
            id: ThemeId::new(id),
            theme_store_id: None,
            name: name.to_string(),
            role,
            previewable: true,
            processing: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    impl MockBackend {
        fn with_themes(themes: Vec<Theme>) -> Self {
            let next = themes.iter().map(|t| t.id.as_u64()).max().unwrap_or(0) + 1;
            let backend = Self::default();
            backend.next_theme_id.store(next, Ordering::SeqCst);
            backend.next_comment_id.store(1, Ordering::SeqCst);
            *backend.themes.lock().unwrap() = themes;
            backend
        }

        fn theme_names(&self) -> Vec<String> {
            self.themes
                .lock()
                .unwrap()
                .iter()
                .map(|t| t.name.clone())
                .collect()
        }

        fn marker_comments(&self) -> Vec<IssueComment> {
            self.comments
                .lock()
                .unwrap()
                .iter()
                .filter(|c| {
                    c.body
                        .as_deref()
                        .is_some_and(|b| contains_marker(b, HIDDEN_COMMENT_MARKER))
                })
                .cloned()
                .collect()
        }
    }

    impl ActionBackend for MockBackend {
        async fn list_themes(&self) -> Result<Vec<Theme>, ActionError> {
            Ok(self.themes.lock().unwrap().clone())
        }

        async fn create_theme(&self, name: &str) -> Result<(), ActionError> {
            self.created_names.lock().unwrap().push(name.to_string());
            if self.lose_creates.load(Ordering::SeqCst) {
                return Ok(());
            }
            let id = self.next_theme_id.fetch_add(1, Ordering::SeqCst);
            self.themes
                .lock()
                .unwrap()
                .push(make_theme(id, name, ThemeRole::Unpublished));
            Ok(())
        }

        async fn delete_theme(&self, id: ThemeId) -> Result<(), ActionError> {
            self.deleted_themes.lock().unwrap().push(id);
            self.themes.lock().unwrap().retain(|t| t.id != id);
            Ok(())
        }

        async fn publish_theme(&self, id: ThemeId) -> Result<(), ActionError> {
            let mut themes = self.themes.lock().unwrap();
            for theme in themes.iter_mut() {
                theme.role = if theme.id == id {
                    ThemeRole::Main
                } else if theme.is_live() {
                    ThemeRole::Unpublished
                } else {
                    theme.role
                };
            }
            Ok(())
        }

        async fn push_theme(
            &self,
            id: ThemeId,
            dir: &Path,
            allow_live: bool,
        ) -> Result<(), ActionError> {
            self.pushes
                .lock()
                .unwrap()
                .push((id, dir.to_path_buf(), allow_live));
            Ok(())
        }

        async fn download_theme(&self, id: ThemeId, _dir: &Path) -> Result<(), ActionError> {
            self.downloads.lock().unwrap().push(id);
            Ok(())
        }

        async fn list_comments(&self, _pr_number: u64) -> Result<Vec<IssueComment>, ActionError> {
            Ok(self.comments.lock().unwrap().clone())
        }

        async fn create_comment(&self, _pr_number: u64, body: &str) -> Result<(), ActionError> {
            let id = self.next_comment_id.fetch_add(1, Ordering::SeqCst);
            self.comments.lock().unwrap().push(IssueComment {
                id: CommentId::new(id),
                body: Some(body.to_string()),
            });
            Ok(())
        }

        async fn delete_comment(&self, id: CommentId) -> Result<(), ActionError> {
            self.comments.lock().unwrap().retain(|c| c.id != id);
            Ok(())
        }
    }

    fn test_config(action: ActionKind) -> ActionConfig {
        ActionConfig {
            action,
            shopify: crate::config::ShopifyConfig {
                store_url: "test.myshopify.com".to_string(),
                api_key: SecretString::from("key"),
                password: SecretString::from("pw"),
                api_version: "2021-04".to_string(),
            },
            theme_id: None,
            theme_dir: PathBuf::from("theme"),
            allow_live: false,
            themekit_flags: Vec::new(),
            github_token: Some(SecretString::from("ghp_test")),
        }
    }

    fn pr_context(pr_number: Option<u64>) -> GithubContext {
        GithubContext {
            owner: "octo".to_string(),
            repo: "storefront".to_string(),
            pr_number,
        }
    }

    // ── registry ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_find_theme_by_name_empty_catalog() {
        let backend = MockBackend::with_themes(Vec::new());
        let found = registry::find_theme_by_name(&backend, "anything").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_create_or_find_is_idempotent() {
        let backend = MockBackend::with_themes(vec![make_theme(1, "Live", ThemeRole::Main)]);

        let first = registry::create_or_find_theme(&backend, "PR 7 - deployment preview")
            .await
            .unwrap();
        let second = registry::create_or_find_theme(&backend, "PR 7 - deployment preview")
            .await
            .unwrap();

        assert!(!first.preexisting);
        assert!(second.preexisting);
        assert_eq!(first.theme.id, second.theme.id);
        assert_eq!(backend.created_names.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_or_find_preexisting_never_creates_or_clones() {
        let backend = MockBackend::with_themes(vec![
            make_theme(1, "Live", ThemeRole::Main),
            make_theme(2, "PR 7 - deployment preview", ThemeRole::Unpublished),
        ]);

        let resolved = registry::create_or_find_theme(&backend, "PR 7 - deployment preview")
            .await
            .unwrap();

        assert!(resolved.preexisting);
        assert_eq!(resolved.theme.id, ThemeId::new(2));
        assert!(backend.created_names.lock().unwrap().is_empty());
        assert!(backend.downloads.lock().unwrap().is_empty());
        assert!(backend.pushes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fresh_creation_clones_live_content() {
        let backend = MockBackend::with_themes(vec![make_theme(1, "Live", ThemeRole::Main)]);

        let resolved = registry::create_or_find_theme(&backend, "PR 9 - deployment preview")
            .await
            .unwrap();

        assert_eq!(*backend.downloads.lock().unwrap(), vec![ThemeId::new(1)]);
        let pushes = backend.pushes.lock().unwrap();
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].0, resolved.theme.id);
        assert!(!pushes[0].2, "cloning must not use the live override");
    }

    #[tokio::test]
    async fn test_fresh_creation_without_live_theme_stays_empty() {
        let backend = MockBackend::with_themes(Vec::new());

        registry::create_or_find_theme(&backend, "PR 9 - deployment preview")
            .await
            .unwrap();

        assert!(backend.downloads.lock().unwrap().is_empty());
        assert!(backend.pushes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_then_lookup_miss_is_consistency_error() {
        let backend = MockBackend::with_themes(Vec::new());
        backend.lose_creates.store(true, Ordering::SeqCst);

        let err = registry::create_or_find_theme(&backend, "PR 9 - deployment preview")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ActionError::ThemeCreationInconsistency { .. }
        ));
    }

    #[tokio::test]
    async fn test_publish_theme_swaps_live_role() {
        let backend = MockBackend::with_themes(vec![
            make_theme(1, "Live", ThemeRole::Main),
            make_theme(2, "Staging", ThemeRole::Unpublished),
        ]);

        backend.publish_theme(ThemeId::new(2)).await.unwrap();

        let themes = backend.themes.lock().unwrap().clone();
        let live: Vec<_> = themes.iter().filter(|t| t.is_live()).collect();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, ThemeId::new(2));
    }

    // ── deploy guard ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_guard_blocks_live_deploy_without_override() {
        let backend = MockBackend::with_themes(vec![make_theme(1, "Live", ThemeRole::Main)]);

        let err = deploy::deploy_theme(&backend, ThemeId::new(1), Path::new("theme"), false)
            .await
            .unwrap_err();

        assert!(matches!(err, ActionError::LiveThemeGuard { .. }));
        assert!(
            backend.pushes.lock().unwrap().is_empty(),
            "guarded deploy must not issue the underlying push"
        );
    }

    #[tokio::test]
    async fn test_guard_allows_live_deploy_with_override() {
        let backend = MockBackend::with_themes(vec![make_theme(1, "Live", ThemeRole::Main)]);

        deploy::deploy_theme(&backend, ThemeId::new(1), Path::new("theme"), true)
            .await
            .unwrap();

        assert_eq!(backend.pushes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deploy_to_id_missing_from_catalog_still_pushes() {
        let backend = MockBackend::with_themes(Vec::new());

        deploy::deploy_theme(&backend, ThemeId::new(404), Path::new("theme"), false)
            .await
            .unwrap();

        assert_eq!(backend.pushes.lock().unwrap().len(), 1);
    }

    // ── comment tracker ─────────────────────────────────────────────────

    #[tokio::test]
    async fn test_replace_marker_comment_twice_leaves_exactly_one() {
        let backend = MockBackend::with_themes(Vec::new());

        comments::replace_marker_comment(&backend, 7, HIDDEN_COMMENT_MARKER, ThemeId::new(10), "one")
            .await
            .unwrap();
        comments::replace_marker_comment(&backend, 7, HIDDEN_COMMENT_MARKER, ThemeId::new(11), "two")
            .await
            .unwrap();

        let markers = backend.marker_comments();
        assert_eq!(markers.len(), 1);
        let body = markers[0].body.as_deref().unwrap();
        assert_eq!(extract_theme_id(body), Some(ThemeId::new(11)));
        assert!(body.ends_with("two"));
    }

    #[tokio::test]
    async fn test_replace_marker_comment_ignores_unrelated_comments() {
        let backend = MockBackend::with_themes(Vec::new());
        backend
            .create_comment(7, "just a human review comment")
            .await
            .unwrap();

        comments::replace_marker_comment(&backend, 7, HIDDEN_COMMENT_MARKER, ThemeId::new(10), "hi")
            .await
            .unwrap();

        assert_eq!(backend.comments.lock().unwrap().len(), 2);
        assert_eq!(backend.marker_comments().len(), 1);
    }

    // ── workflows ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_deployment_preview_end_to_end() {
        let backend = MockBackend::with_themes(vec![make_theme(1, "Live", ThemeRole::Main)]);
        let config = test_config(ActionKind::DeploymentPreview);
        let context = pr_context(Some(7));

        let outputs = run(&backend, &config, Some(&context)).await.unwrap().unwrap();

        assert!(backend.theme_names().contains(&"PR 7 - deployment preview".to_string()));
        assert_eq!(
            outputs.preview_url,
            format!("https://test.myshopify.com/?preview_theme_id={}", outputs.theme_id)
        );

        // The marker comment records the deployed theme id
        let markers = backend.marker_comments();
        assert_eq!(markers.len(), 1);
        assert_eq!(
            extract_theme_id(markers[0].body.as_deref().unwrap()),
            Some(outputs.theme_id)
        );
    }

    #[tokio::test]
    async fn test_deployment_preview_requires_pull_request() {
        let backend = MockBackend::with_themes(Vec::new());
        let config = test_config(ActionKind::DeploymentPreview);
        let context = pr_context(None);

        let err = run(&backend, &config, Some(&context)).await.unwrap_err();
        assert!(matches!(err, ActionError::PreviewRequiresPullRequest));
    }

    #[tokio::test]
    async fn test_deploy_requires_theme_id() {
        let backend = MockBackend::with_themes(Vec::new());
        let config = test_config(ActionKind::Deploy);

        let err = run(&backend, &config, None).await.unwrap_err();
        assert!(matches!(err, ActionError::MissingThemeId));
        assert!(backend.pushes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deploy_without_token_skips_comment() {
        let backend =
            MockBackend::with_themes(vec![make_theme(3, "Staging", ThemeRole::Unpublished)]);
        let mut config = test_config(ActionKind::Deploy);
        config.theme_id = Some(ThemeId::new(3));
        config.github_token = None;

        let outputs = run(&backend, &config, Some(&pr_context(Some(7))))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(outputs.theme_id, ThemeId::new(3));
        assert_eq!(backend.pushes.lock().unwrap().len(), 1);
        assert!(backend.comments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_teardown_with_no_marker_completes_without_delete() {
        let backend = MockBackend::with_themes(vec![make_theme(1, "Live", ThemeRole::Main)]);
        let config = test_config(ActionKind::RemoveDeploymentPreviewTheme);

        run(&backend, &config, Some(&pr_context(Some(7)))).await.unwrap();

        assert!(backend.deleted_themes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_teardown_deletes_recorded_theme_but_keeps_comment() {
        let backend = MockBackend::with_themes(vec![
            make_theme(1, "Live", ThemeRole::Main),
            make_theme(20, "PR 7 - deployment preview", ThemeRole::Unpublished),
        ]);
        comments::replace_marker_comment(&backend, 7, HIDDEN_COMMENT_MARKER, ThemeId::new(20), "ok")
            .await
            .unwrap();
        let config = test_config(ActionKind::RemoveDeploymentPreviewTheme);

        run(&backend, &config, Some(&pr_context(Some(7)))).await.unwrap();

        assert_eq!(*backend.deleted_themes.lock().unwrap(), vec![ThemeId::new(20)]);
        // Teardown removes the theme, not the comment; the stale marker
        // keeps pointing at the deleted id.
        assert_eq!(backend.marker_comments().len(), 1);
    }

    #[tokio::test]
    async fn test_teardown_with_unparseable_marker_is_soft() {
        let backend = MockBackend::with_themes(Vec::new());
        backend
            .create_comment(7, &format!("<!-- {HIDDEN_COMMENT_MARKER} -->no id tag here"))
            .await
            .unwrap();
        let config = test_config(ActionKind::RemoveDeploymentPreviewTheme);

        run(&backend, &config, Some(&pr_context(Some(7)))).await.unwrap();

        assert!(backend.deleted_themes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_teardown_requires_token() {
        let backend = MockBackend::with_themes(Vec::new());
        let mut config = test_config(ActionKind::RemoveDeploymentPreviewTheme);
        config.github_token = None;

        let err = run(&backend, &config, Some(&pr_context(Some(7)))).await.unwrap_err();
        assert!(matches!(err, ActionError::MissingGithubToken));
    }

    #[tokio::test]
    async fn test_teardown_requires_pull_request() {
        let backend = MockBackend::with_themes(Vec::new());
        let config = test_config(ActionKind::RemoveDeploymentPreviewTheme);

        let err = run(&backend, &config, Some(&pr_context(None))).await.unwrap_err();
        assert!(matches!(err, ActionError::NotInPullRequest));
    }
}
