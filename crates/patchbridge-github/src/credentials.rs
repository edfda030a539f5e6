use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use patchbridge_core::ConfigurationError;

use crate::client::GithubIssueClient;
use crate::error::GithubClientError;
use crate::repo_ref::RepoRef;

#[derive(Clone, Default)]
/// Raw credential inputs, typically read from flags or the environment.
pub struct GithubCredentials {
    pub token: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for GithubCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubCredentials")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
/// Authentication scheme selected from `GithubCredentials`.
pub enum GithubAuth {
    Token(String),
    Basic { user: String, password: String },
}

impl std::fmt::Debug for GithubAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => f.write_str("GithubAuth::Token(<redacted>)"),
            Self::Basic { user, .. } => write!(f, "GithubAuth::Basic {{ user: {user:?} }}"),
        }
    }
}

impl GithubAuth {
    pub fn authorization_header(&self) -> String {
        match self {
            Self::Token(token) => format!("Bearer {token}"),
            Self::Basic { user, password } => {
                format!("Basic {}", BASE64.encode(format!("{user}:{password}")))
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

impl GithubCredentials {
    /// Pick the authentication scheme: a token wins over a user/password pair.
    pub fn resolve(&self) -> Result<GithubAuth, ConfigurationError> {
        if let Some(token) = non_empty(self.token.as_deref()) {
            return Ok(GithubAuth::Token(token.to_string()));
        }
        match (
            non_empty(self.user.as_deref()),
            non_empty(self.password.as_deref()),
        ) {
            (Some(user), Some(password)) => Ok(GithubAuth::Basic {
                user: user.to_string(),
                password: password.to_string(),
            }),
            _ => Err(ConfigurationError),
        }
    }
}

/// Build an authenticated client for `repo`, failing fast without credentials.
pub fn get_client(
    credentials: &GithubCredentials,
    api_base: &str,
    repo: RepoRef,
    request_timeout_ms: u64,
) -> Result<GithubIssueClient, GithubClientError> {
    let auth = credentials.resolve()?;
    GithubIssueClient::new(api_base, &auth, repo, request_timeout_ms)
}
