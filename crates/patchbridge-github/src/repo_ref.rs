use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid repository '{raw}', expected owner/repo")]
/// Raised when a repository slug is not in `owner/repo` form.
pub struct RepoRefError {
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// GitHub repository coordinates.
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn parse(raw: &str) -> Result<Self, RepoRefError> {
        let invalid = || RepoRefError {
            raw: raw.to_string(),
        };
        let (owner, name) = raw.trim().split_once('/').ok_or_else(invalid)?;
        let owner = owner.trim();
        let name = name.trim();
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn as_slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
