use patchbridge_core::ConfigurationError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Enumerates supported `GithubClientError` values.
pub enum GithubClientError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("invalid github authorization header: {0}")]
    InvalidAuthHeader(String),
    #[error("failed to create github api client: {0}")]
    Build(String),
}

impl GithubClientError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
