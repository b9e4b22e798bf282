//! Theme registry resolution.
//!
//! The catalog offers no query-by-name endpoint, so a logical name is
//! resolved to an id by scanning the full listing. Deliberately uncached:
//! every call re-fetches, and consecutive calls can observe different
//! snapshots of the eventually-consistent catalog. Caching here would mask
//! the concurrent-creation race instead of surfacing it.

use tracing::{debug, info};

use theme_actions_core::Theme;

use crate::backend::ActionBackend;
use crate::deploy;
use crate::error::ActionError;

/// Result of [`create_or_find_theme`].
#[derive(Debug, Clone)]
pub struct ResolvedTheme {
    /// Whether the theme already existed before this invocation.
    pub preexisting: bool,
    /// The matching or newly created theme.
    pub theme: Theme,
}

/// Resolve a theme by its exact name.
///
/// Linear scan over the full catalog; O(n) in total theme count, acceptable
/// at per-PR-event deploy frequency. An empty catalog yields `None`.
///
/// # Errors
///
/// Returns error if the catalog fetch fails.
pub async fn find_theme_by_name<B: ActionBackend>(
    backend: &B,
    name: &str,
) -> Result<Option<Theme>, ActionError> {
    let themes = backend.list_themes().await?;
    Ok(themes.into_iter().find(|theme| theme.name == name))
}

/// Converge on a theme with the given name, creating it if absent.
///
/// Repeated invocations for the same logical name are safe: the second run
/// finds the first run's theme and does not create a duplicate. On first
/// creation the current live theme's content is cloned into the new theme so
/// previews start from production content rather than empty; a preexisting
/// theme is never overwritten this way, since that would clobber ongoing
/// preview edits with stale production content.
///
/// Known limitation: two invocations racing for the same name can both
/// observe "absent" and both create, yielding two themes with the same name.
/// There is no distributed lock available to prevent this.
///
/// # Errors
///
/// Returns [`ActionError::ThemeCreationInconsistency`] when the catalog
/// accepted the create but a follow-up lookup still finds nothing - a
/// consistency failure, not retried. Remote failures propagate unmodified.
pub async fn create_or_find_theme<B: ActionBackend>(
    backend: &B,
    name: &str,
) -> Result<ResolvedTheme, ActionError> {
    if let Some(theme) = find_theme_by_name(backend, name).await? {
        debug!(name, theme_id = %theme.id, "Theme already exists");
        return Ok(ResolvedTheme {
            preexisting: true,
            theme,
        });
    }

    info!(name, "Theme not found, creating it");
    backend.create_theme(name).await?;

    let Some(theme) = find_theme_by_name(backend, name).await? else {
        return Err(ActionError::ThemeCreationInconsistency {
            name: name.to_string(),
        });
    };

    deploy::duplicate_live_theme(backend, theme.id).await?;

    Ok(ResolvedTheme {
        preexisting: false,
        theme,
    })
}
