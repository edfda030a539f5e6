//! GitHub REST payload shapes and their conversion into tracker types.

use chrono::{DateTime, Utc};
use patchbridge_core::{TrackerComment, TrackerIssue};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Public struct `GithubUser` returned by the GitHub API.
pub struct GithubUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Public struct `GithubIssue` returned by the GitHub API.
pub struct GithubIssue {
    pub number: u64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub assignees: Vec<GithubUser>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub pull_request: Option<Value>,
}

impl GithubIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

impl From<GithubIssue> for TrackerIssue {
    fn from(issue: GithubIssue) -> Self {
        Self {
            number: issue.number,
            title: issue.title,
            state: issue.state,
            assignees: issue.assignees.into_iter().map(|user| user.login).collect(),
            created_at: issue.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Public struct `GithubIssueComment` returned by the GitHub API.
pub struct GithubIssueComment {
    pub id: u64,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user: Option<GithubUser>,
}

impl From<GithubIssueComment> for TrackerComment {
    fn from(comment: GithubIssueComment) -> Self {
        Self {
            id: comment.id,
            author_login: comment.user.map(|user| user.login).unwrap_or_default(),
            body: comment.body.unwrap_or_default(),
            created_at: comment.created_at,
        }
    }
}
