//! GitHub issue-comment REST client.
//!
//! PR conversation comments are issue comments in the REST API, hence the
//! `/issues/` paths.

use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use theme_actions_core::CommentId;

use super::{GithubContext, GithubError};

const API_BASE: &str = "https://api.github.com";

/// A comment on the pull-request conversation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueComment {
    /// Comment id, used for deletion.
    pub id: CommentId,
    /// Comment body; GitHub omits it in some list contexts.
    pub body: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateCommentRequest<'a> {
    body: &'a str,
}

/// GitHub REST client scoped to one repository's issue comments.
#[derive(Clone)]
pub struct CommentsClient {
    client: Client,
    owner: String,
    repo: String,
    token: SecretString,
}

impl std::fmt::Debug for CommentsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentsClient")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl CommentsClient {
    /// Create a client for the repository in `context`.
    #[must_use]
    pub fn new(context: &GithubContext, token: SecretString) -> Self {
        Self {
            client: Client::new(),
            owner: context.owner.clone(),
            repo: context.repo.clone(),
            token,
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        // GitHub rejects requests without a User-Agent
        headers.insert(USER_AGENT, HeaderValue::from_static("shopify-theme-actions"));
        headers
    }

    /// List all comments on a pull request's conversation.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response does not parse.
    #[instrument(skip(self), fields(owner = %self.owner, repo = %self.repo, pr = pr_number))]
    pub async fn list_comments(&self, pr_number: u64) -> Result<Vec<IssueComment>, GithubError> {
        let url = format!(
            "{API_BASE}/repos/{}/{}/issues/{pr_number}/comments",
            self.owner, self.repo
        );
        let response = self
            .client
            .get(url)
            .headers(self.headers())
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(|e| GithubError::Request(e.to_string()))?;

        let response = check_status(response).await?;
        let comments: Vec<IssueComment> = response
            .json()
            .await
            .map_err(|e| GithubError::Response(e.to_string()))?;

        debug!(count = comments.len(), "Fetched PR comments");
        Ok(comments)
    }

    /// Create a comment on a pull request's conversation.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or GitHub rejects the creation.
    #[instrument(skip(self, body), fields(owner = %self.owner, repo = %self.repo, pr = pr_number))]
    pub async fn create_comment(&self, pr_number: u64, body: &str) -> Result<(), GithubError> {
        let url = format!(
            "{API_BASE}/repos/{}/{}/issues/{pr_number}/comments",
            self.owner, self.repo
        );
        let response = self
            .client
            .post(url)
            .headers(self.headers())
            .bearer_auth(self.token.expose_secret())
            .json(&CreateCommentRequest { body })
            .send()
            .await
            .map_err(|e| GithubError::Request(e.to_string()))?;

        check_status(response).await?;
        debug!("Comment created");
        Ok(())
    }

    /// Delete a comment by id.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or GitHub rejects the deletion.
    #[instrument(skip(self), fields(owner = %self.owner, repo = %self.repo, comment_id = %comment_id))]
    pub async fn delete_comment(&self, comment_id: CommentId) -> Result<(), GithubError> {
        let url = format!(
            "{API_BASE}/repos/{}/{}/issues/comments/{comment_id}",
            self.owner, self.repo
        );
        let response = self
            .client
            .delete(url)
            .headers(self.headers())
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(|e| GithubError::Request(e.to_string()))?;

        check_status(response).await?;
        debug!("Comment deleted");
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GithubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GithubError::Api {
        status: status.as_u16(),
        body,
    })
}
