//! Core decision logic for the patchbridge commit-to-issue bridge.
//!
//! Exposes the commit-message tag parser, the `/assign` request resolver and
//! the tracker capability traits the resolver drives. Nothing in this crate
//! talks to the network; tracker adapters live in sibling crates.

pub mod assignment;
pub mod bot_comment;
pub mod commit_tags;
pub mod error;
pub mod tracker;

pub use assignment::{
    assign_issues, find_assignment_request, issue_age_days, try_assign, AssignmentDecision,
    AssignmentReport, AssignmentResolver, NeverStale, StalenessPolicy, ASSIGN_TRIGGER,
    DEFAULT_MAINTAINER_TEAM,
};
pub use bot_comment::{find_bot_comment, get_bot_comment};
pub use commit_tags::{parse_issue_number, parse_issue_value, IssueReferences};
pub use error::{ConfigurationError, TagValueError, TrackerError};
pub use tracker::{IssueTracker, TrackerComment, TrackerIssue, OPEN_ISSUE_STATE};
