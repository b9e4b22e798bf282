//! GitHub integration: CI context and the issue-comment API.
//!
//! This module provides:
//! - [`GithubContext`] - repository and pull-request number read from the
//!   workflow environment
//! - [`CommentsClient`] - list/create/delete comments on the pull request
//!
//! Commenting is best-effort enrichment of a deploy, never required for it
//! to succeed; only teardown hard-requires the comment API, because the
//! marker comment is the sole durable record of the preview theme id.

mod client;
mod context;

pub use client::{CommentsClient, IssueComment};
pub use context::GithubContext;

use thiserror::Error;

/// Errors that can occur when interacting with the GitHub API.
#[derive(Debug, Error)]
pub enum GithubError {
    /// HTTP request failed.
    #[error("GitHub request failed: {0}")]
    Request(String),

    /// Failed to parse the response body.
    #[error("GitHub response error: {0}")]
    Response(String),

    /// GitHub returned a non-success status.
    #[error("GitHub API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// A comment operation was attempted without a configured token.
    #[error("GitHub token is not configured")]
    MissingToken,
}
