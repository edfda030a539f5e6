use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no valid credentials provided: set a token or both a username and a password")]
/// Raised when a tracker client is requested without usable credentials.
pub struct ConfigurationError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value '{value}' could not be converted to an issue number")]
/// Non-fatal failure to read an issue number out of a commit tag.
pub struct TagValueError {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enumerates supported `TrackerError` values.
pub enum TrackerError {
    #[error("issue tracker {operation} request failed: {message}")]
    Transport { operation: String, message: String },
    #[error("issue tracker {operation} failed with status {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },
    #[error("failed to decode issue tracker {operation}: {message}")]
    Decode { operation: String, message: String },
    #[error("issue tracker client setup failed: {0}")]
    Client(String),
}

impl TrackerError {
    pub fn operation(&self) -> Option<&str> {
        match self {
            Self::Transport { operation, .. }
            | Self::Status { operation, .. }
            | Self::Decode { operation, .. } => Some(operation.as_str()),
            Self::Client(_) => None,
        }
    }
}
