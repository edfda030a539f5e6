//! GitHub REST adapter for patchbridge.
//!
//! Implements `patchbridge_core::IssueTracker` over the blocking `reqwest`
//! client and owns credential resolution for client construction.

pub mod client;
pub mod credentials;
pub mod error;
pub mod repo_ref;
pub mod wire;

pub use client::{GithubIssueClient, DEFAULT_GITHUB_API_BASE, DEFAULT_REQUEST_TIMEOUT_MS};
pub use credentials::{get_client, GithubAuth, GithubCredentials};
pub use error::GithubClientError;
pub use repo_ref::{RepoRef, RepoRefError};
