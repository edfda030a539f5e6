use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// Issue state string selected by the assignment pass. Compared case-sensitively.
pub const OPEN_ISSUE_STATE: &str = "open";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Snapshot of one tracker issue as seen by the assignment pass.
pub struct TrackerIssue {
    pub number: u64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub assignees: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl TrackerIssue {
    pub fn is_open(&self) -> bool {
        self.state == OPEN_ISSUE_STATE
    }

    pub fn has_assignees(&self) -> bool {
        !self.assignees.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One issue comment, in the order the tracker returned it.
pub struct TrackerComment {
    pub id: u64,
    pub author_login: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Capabilities the assignment pass needs from an issue tracker.
///
/// Implementations are scoped to one repository. `list_comments` must return
/// comments oldest first.
pub trait IssueTracker {
    fn list_issues(&self) -> Result<Vec<TrackerIssue>, TrackerError>;

    fn list_comments(&self, issue_number: u64) -> Result<Vec<TrackerComment>, TrackerError>;

    fn add_assignees(&self, issue_number: u64, logins: &[String]) -> Result<(), TrackerError>;

    fn remove_assignees(&self, issue_number: u64, logins: &[String]) -> Result<(), TrackerError>;

    fn create_comment(&self, issue_number: u64, body: &str) -> Result<(), TrackerError>;
}
