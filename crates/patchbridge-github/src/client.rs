use std::time::Duration;

use patchbridge_core::{IssueTracker, TrackerComment, TrackerError, TrackerIssue};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::credentials::GithubAuth;
use crate::error::GithubClientError;
use crate::repo_ref::RepoRef;
use crate::wire::{GithubIssue, GithubIssueComment};

pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const GITHUB_PAGE_SIZE: usize = 100;
const ERROR_BODY_MAX_CHARS: usize = 800;

fn truncate_for_error(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated = text.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}

#[derive(Clone, Debug)]
/// Blocking GitHub issues client scoped to a single repository.
pub struct GithubIssueClient {
    http: Client,
    api_base: String,
    repo: RepoRef,
}

impl GithubIssueClient {
    pub fn new(
        api_base: &str,
        auth: &GithubAuth,
        repo: RepoRef,
        request_timeout_ms: u64,
    ) -> Result<Self, GithubClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("patchbridge"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );
        let mut auth_value = HeaderValue::from_str(&auth.authorization_header())
            .map_err(|error| GithubClientError::InvalidAuthHeader(error.to_string()))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .map_err(|error| GithubClientError::Build(error.to_string()))?;
        Ok(Self {
            http,
            api_base: api_base.trim().trim_end_matches('/').to_string(),
            repo,
        })
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    fn issues_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/issues",
            self.api_base, self.repo.owner, self.repo.name
        )
    }

    fn issue_url(&self, issue_number: u64, suffix: &str) -> String {
        format!("{}/{issue_number}/{suffix}", self.issues_url())
    }

    fn list_paginated<T, F>(
        &self,
        operation: &str,
        request_builder: F,
    ) -> Result<Vec<T>, TrackerError>
    where
        T: DeserializeOwned,
        F: Fn(&str) -> RequestBuilder,
    {
        let page_size = GITHUB_PAGE_SIZE.to_string();
        let mut page = 1_u32;
        let mut rows = Vec::new();
        loop {
            let page_value = page.to_string();
            let chunk: Vec<T> = self.request_json(
                operation,
                request_builder(page_size.as_str()).query(&[("page", page_value.as_str())]),
            )?;
            let chunk_len = chunk.len();
            rows.extend(chunk);
            if chunk_len < GITHUB_PAGE_SIZE {
                break;
            }
            page = page.saturating_add(1);
        }
        Ok(rows)
    }

    fn request_json<T>(&self, operation: &str, request: RequestBuilder) -> Result<T, TrackerError>
    where
        T: DeserializeOwned,
    {
        debug!(operation, repo = %self.repo, "sending github request");
        let response = request.send().map_err(|error| TrackerError::Transport {
            operation: operation.to_string(),
            message: error.to_string(),
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TrackerError::Status {
                operation: operation.to_string(),
                status: status.as_u16(),
                body: truncate_for_error(&body, ERROR_BODY_MAX_CHARS),
            });
        }
        response.json::<T>().map_err(|error| TrackerError::Decode {
            operation: operation.to_string(),
            message: error.to_string(),
        })
    }
}

impl IssueTracker for GithubIssueClient {
    fn list_issues(&self) -> Result<Vec<TrackerIssue>, TrackerError> {
        let issues: Vec<GithubIssue> = self.list_paginated("list issues", |per_page| {
            self.http
                .get(self.issues_url())
                .query(&[("state", "open"), ("per_page", per_page)])
        })?;
        Ok(issues
            .into_iter()
            .filter(|issue| !issue.is_pull_request())
            .map(TrackerIssue::from)
            .collect())
    }

    fn list_comments(&self, issue_number: u64) -> Result<Vec<TrackerComment>, TrackerError> {
        let comments: Vec<GithubIssueComment> =
            self.list_paginated("list issue comments", |per_page| {
                self.http
                    .get(self.issue_url(issue_number, "comments"))
                    .query(&[
                        ("sort", "created"),
                        ("direction", "asc"),
                        ("per_page", per_page),
                    ])
            })?;
        Ok(comments.into_iter().map(TrackerComment::from).collect())
    }

    fn add_assignees(&self, issue_number: u64, logins: &[String]) -> Result<(), TrackerError> {
        let payload = json!({ "assignees": logins });
        let _: Value = self.request_json(
            "add issue assignees",
            self.http
                .post(self.issue_url(issue_number, "assignees"))
                .json(&payload),
        )?;
        Ok(())
    }

    fn remove_assignees(&self, issue_number: u64, logins: &[String]) -> Result<(), TrackerError> {
        let payload = json!({ "assignees": logins });
        let _: Value = self.request_json(
            "remove issue assignees",
            self.http
                .delete(self.issue_url(issue_number, "assignees"))
                .json(&payload),
        )?;
        Ok(())
    }

    fn create_comment(&self, issue_number: u64, body: &str) -> Result<(), TrackerError> {
        let payload = json!({ "body": body });
        let _: Value = self.request_json(
            "create issue comment",
            self.http
                .post(self.issue_url(issue_number, "comments"))
                .json(&payload),
        )?;
        Ok(())
    }
}
