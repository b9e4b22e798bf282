//! Deploy guard and live-theme duplication.

use std::path::Path;

use tracing::{info, warn};

use theme_actions_core::ThemeId;

use crate::backend::ActionBackend;
use crate::error::ActionError;

/// Push local theme code to a remote theme, refusing to touch the live
/// theme unless explicitly overridden.
///
/// The guard consults the catalog first: if the target currently has the
/// `main` role and `allow_live` is false, this fails *before* any code is
/// pushed. A target missing from the catalog snapshot is pushed anyway (the
/// catalog is eventually consistent and the remote end is authoritative).
///
/// # Errors
///
/// Returns [`ActionError::LiveThemeGuard`] on a guarded live target; remote
/// failures propagate unmodified.
pub async fn deploy_theme<B: ActionBackend>(
    backend: &B,
    theme_id: ThemeId,
    dir: &Path,
    allow_live: bool,
) -> Result<(), ActionError> {
    let themes = backend.list_themes().await?;
    match themes.iter().find(|theme| theme.id == theme_id) {
        Some(theme) if theme.is_live() && !allow_live => {
            return Err(ActionError::LiveThemeGuard { id: theme_id });
        }
        Some(theme) if theme.is_live() => {
            info!(theme_id = %theme_id, "Live theme deployment explicitly allowed");
        }
        Some(_) => {}
        None => {
            warn!(
                theme_id = %theme_id,
                "Theme not present in the catalog snapshot, deploying anyway"
            );
        }
    }

    backend.push_theme(theme_id, dir, allow_live).await
}

/// Clone the current live theme's content into `target_id`.
///
/// Downloads the live theme into a scoped temporary directory and pushes it
/// into the target. The directory is removed when the `TempDir` guard drops,
/// whether or not the push succeeds, so nothing leaks into subsequent runs
/// on reused execution environments.
///
/// A store with no live theme is a no-op, not an error.
///
/// # Errors
///
/// Returns error if the temp directory cannot be created or a transfer
/// fails.
pub async fn duplicate_live_theme<B: ActionBackend>(
    backend: &B,
    target_id: ThemeId,
) -> Result<(), ActionError> {
    let themes = backend.list_themes().await?;
    let Some(live) = themes.iter().find(|theme| theme.is_live()) else {
        info!("No live theme to duplicate, leaving the new theme empty");
        return Ok(());
    };

    info!(live_id = %live.id, target_id = %target_id, "Duplicating live theme content");
    let workdir = tempfile::tempdir()?;
    backend.download_theme(live.id, workdir.path()).await?;
    backend.push_theme(target_id, workdir.path(), false).await?;
    Ok(())
}
