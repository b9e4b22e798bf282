//! Workflow run context.
//!
//! GitHub Actions describes the triggering event through two environment
//! variables: `GITHUB_REPOSITORY` (`owner/name`) and `GITHUB_EVENT_PATH`
//! (path to the event payload JSON). The pull-request number lives inside
//! the payload, under `pull_request.number` for PR events and
//! `issue.number` for comment events.

use std::env;
use std::fs;

use serde_json::Value;
use tracing::{debug, warn};

/// Repository and pull-request scope of the current run.
///
/// Many CI events are not PR-scoped, so `pr_number` being absent is an
/// ordinary state, not an error. Components that need a PR fail with their
/// own precondition error instead.
#[derive(Debug, Clone)]
pub struct GithubContext {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Pull request number, when the triggering event is PR-scoped.
    pub pr_number: Option<u64>,
}

impl GithubContext {
    /// Read the context from the workflow environment.
    ///
    /// Returns `None` when `GITHUB_REPOSITORY` is unset (not running inside
    /// GitHub Actions at all), in which case comment operations are skipped.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let repository = env::var("GITHUB_REPOSITORY").ok()?;
        let (owner, repo) = repository.split_once('/')?;

        let pr_number = env::var("GITHUB_EVENT_PATH")
            .ok()
            .and_then(|path| match fs::read_to_string(&path) {
                Ok(raw) => serde_json::from_str::<Value>(&raw).ok(),
                Err(e) => {
                    warn!(path, error = %e, "Could not read event payload");
                    None
                }
            })
            .as_ref()
            .and_then(pr_number_from_event);

        debug!(owner, repo, ?pr_number, "Resolved GitHub context");
        Some(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            pr_number,
        })
    }
}

/// Pull the PR number out of an event payload.
fn pr_number_from_event(event: &Value) -> Option<u64> {
    event
        .pointer("/pull_request/number")
        .or_else(|| event.pointer("/issue/number"))
        .and_then(Value::as_u64)
}
