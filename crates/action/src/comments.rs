//! Marker-comment state tracking.
//!
//! The preview theme id is persisted across workflow runs inside a hidden
//! marker comment on the pull request (the action has no other durable
//! store). The invariant - at most one marker comment per PR - is enforced
//! here by find-then-delete-then-create, not by GitHub.

use tracing::{debug, info};

use theme_actions_core::{ThemeId, contains_marker, encode_marker_comment};

use crate::backend::ActionBackend;
use crate::error::ActionError;
use crate::github::IssueComment;

/// Find the marker comment on a pull request, if any.
///
/// Returns the first comment whose body contains `marker`.
///
/// # Errors
///
/// Returns error if the comment listing fails.
pub async fn find_marker_comment<B: ActionBackend>(
    backend: &B,
    pr_number: u64,
    marker: &str,
) -> Result<Option<IssueComment>, ActionError> {
    let comments = backend.list_comments(pr_number).await?;
    Ok(comments.into_iter().find(|comment| {
        comment
            .body
            .as_deref()
            .is_some_and(|body| contains_marker(body, marker))
    }))
}

/// Replace the marker comment on a pull request.
///
/// Deletes any existing marker comment, then creates a new one embedding the
/// hidden marker, the theme id tag and the visible message. Called after
/// every successful deploy so the recorded theme id tracks the latest state.
///
/// # Errors
///
/// Returns error if a comment call fails. (Running outside a PR or without
/// a token is handled by the caller skipping this entirely.)
pub async fn replace_marker_comment<B: ActionBackend>(
    backend: &B,
    pr_number: u64,
    marker: &str,
    theme_id: ThemeId,
    message: &str,
) -> Result<(), ActionError> {
    if let Some(existing) = find_marker_comment(backend, pr_number, marker).await? {
        debug!(comment_id = %existing.id, "Deleting previous marker comment");
        backend.delete_comment(existing.id).await?;
    }

    let body = encode_marker_comment(marker, theme_id, message);
    backend.create_comment(pr_number, &body).await?;
    info!(pr_number, theme_id = %theme_id, "Marker comment updated");
    Ok(())
}
