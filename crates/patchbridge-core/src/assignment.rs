//! `/assign` request resolution for open issues.
//!
//! A resolver reads an issue's comment history, picks the newest assignment
//! request, and either assigns the requester, leaves the issue alone, or asks
//! the maintainer team to settle a conflict.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::TrackerError;
use crate::tracker::{IssueTracker, TrackerComment, TrackerIssue};

/// Comment substring that marks an assignment request.
pub const ASSIGN_TRIGGER: &str = "/assign";
pub const DEFAULT_MAINTAINER_TEAM: &str = "@airshipit/airship-cores";

/// Decides whether an already-assigned issue may be handed to a new requester.
pub trait StalenessPolicy {
    fn is_stale(&self, issue: &TrackerIssue, now: DateTime<Utc>) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Staleness policy that never releases an existing assignment.
pub struct NeverStale;

impl StalenessPolicy for NeverStale {
    fn is_stale(&self, _issue: &TrackerIssue, _now: DateTime<Utc>) -> bool {
        false
    }
}

impl<F> StalenessPolicy for F
where
    F: Fn(&TrackerIssue, DateTime<Utc>) -> bool,
{
    fn is_stale(&self, issue: &TrackerIssue, now: DateTime<Utc>) -> bool {
        self(issue, now)
    }
}

/// Whole days elapsed since the issue was opened.
pub fn issue_age_days(issue: &TrackerIssue, now: DateTime<Utc>) -> i64 {
    (now - issue.created_at).num_days()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
/// Enumerates supported `AssignmentDecision` values.
pub enum AssignmentDecision {
    NoRequest,
    Assign {
        requester: String,
    },
    Reassign {
        requester: String,
        previous: Vec<String>,
    },
    Conflict {
        requester: String,
        assignees: Vec<String>,
    },
}

impl AssignmentDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoRequest => "no_request",
            Self::Assign { .. } => "assign",
            Self::Reassign { .. } => "reassign",
            Self::Conflict { .. } => "conflict",
        }
    }
}

/// Return the newest comment carrying the assignment trigger.
pub fn find_assignment_request(comments: &[TrackerComment]) -> Option<&TrackerComment> {
    comments
        .iter()
        .rev()
        .find(|comment| comment.body.contains(ASSIGN_TRIGGER))
}

pub fn render_assigned_comment(requester: &str) -> String {
    format!("assigned {requester}")
}

pub fn render_reassigned_comment(previous: &[String], requester: &str) -> String {
    format!(
        "unassigned: {}\nassigned: {requester}",
        previous.join(", ")
    )
}

pub fn render_conflict_comment(requester: &str, maintainer_team: &str) -> String {
    format!(
        "Unable to assign {requester}. Please contact a member of the {maintainer_team} team for help with assignments."
    )
}

#[derive(Debug, Clone)]
/// Resolves `/assign` requests against a tracker.
pub struct AssignmentResolver<P = NeverStale> {
    maintainer_team: String,
    staleness: P,
}

impl AssignmentResolver<NeverStale> {
    pub fn new(maintainer_team: impl Into<String>) -> Self {
        Self {
            maintainer_team: maintainer_team.into(),
            staleness: NeverStale,
        }
    }
}

impl Default for AssignmentResolver<NeverStale> {
    fn default() -> Self {
        Self::new(DEFAULT_MAINTAINER_TEAM)
    }
}

impl<P: StalenessPolicy> AssignmentResolver<P> {
    pub fn with_staleness_policy<Q: StalenessPolicy>(self, staleness: Q) -> AssignmentResolver<Q> {
        AssignmentResolver {
            maintainer_team: self.maintainer_team,
            staleness,
        }
    }

    pub fn maintainer_team(&self) -> &str {
        &self.maintainer_team
    }

    pub fn decide(
        &self,
        issue: &TrackerIssue,
        comments: &[TrackerComment],
        now: DateTime<Utc>,
    ) -> AssignmentDecision {
        let Some(request) = find_assignment_request(comments) else {
            return AssignmentDecision::NoRequest;
        };
        let requester = request.author_login.clone();
        if !issue.has_assignees() {
            return AssignmentDecision::Assign { requester };
        }
        if self.staleness.is_stale(issue, now) {
            return AssignmentDecision::Reassign {
                requester,
                previous: issue.assignees.clone(),
            };
        }
        AssignmentDecision::Conflict {
            requester,
            assignees: issue.assignees.clone(),
        }
    }

    pub fn apply<T>(
        &self,
        tracker: &T,
        issue: &TrackerIssue,
        decision: &AssignmentDecision,
    ) -> Result<(), TrackerError>
    where
        T: IssueTracker + ?Sized,
    {
        match decision {
            AssignmentDecision::NoRequest => Ok(()),
            AssignmentDecision::Assign { requester } => {
                tracker.add_assignees(issue.number, std::slice::from_ref(requester))?;
                tracker.create_comment(issue.number, &render_assigned_comment(requester))
            }
            AssignmentDecision::Reassign {
                requester,
                previous,
            } => {
                tracker.remove_assignees(issue.number, previous)?;
                tracker.add_assignees(issue.number, std::slice::from_ref(requester))?;
                tracker.create_comment(
                    issue.number,
                    &render_reassigned_comment(previous, requester),
                )
            }
            AssignmentDecision::Conflict { requester, .. } => tracker.create_comment(
                issue.number,
                &render_conflict_comment(requester, &self.maintainer_team),
            ),
        }
    }

    pub fn try_assign<T>(
        &self,
        tracker: &T,
        issue: &TrackerIssue,
    ) -> Result<AssignmentDecision, TrackerError>
    where
        T: IssueTracker + ?Sized,
    {
        let comments = tracker.list_comments(issue.number)?;
        let decision = self.decide(issue, &comments, Utc::now());
        debug!(
            issue = issue.number,
            decision = decision.as_str(),
            "resolved assignment request"
        );
        self.apply(tracker, issue, &decision)?;
        if decision != AssignmentDecision::NoRequest {
            info!(
                issue = issue.number,
                decision = decision.as_str(),
                "applied assignment decision"
            );
        }
        Ok(decision)
    }
}

/// Resolve the newest `/assign` request on `issue` with the default resolver.
pub fn try_assign<T>(tracker: &T, issue: &TrackerIssue) -> Result<AssignmentDecision, TrackerError>
where
    T: IssueTracker + ?Sized,
{
    AssignmentResolver::new(DEFAULT_MAINTAINER_TEAM).try_assign(tracker, issue)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Per-run counters reported by `assign_issues`.
pub struct AssignmentReport {
    pub scanned_issues: usize,
    pub open_issues: usize,
    pub assigned: usize,
    pub reassigned: usize,
    pub conflicts: usize,
    pub no_request: usize,
    pub failed: usize,
}

impl AssignmentReport {
    fn record(&mut self, decision: &AssignmentDecision) {
        let counter = match decision {
            AssignmentDecision::NoRequest => &mut self.no_request,
            AssignmentDecision::Assign { .. } => &mut self.assigned,
            AssignmentDecision::Reassign { .. } => &mut self.reassigned,
            AssignmentDecision::Conflict { .. } => &mut self.conflicts,
        };
        *counter = counter.saturating_add(1);
    }
}

/// Run the resolver over every open issue the tracker lists.
///
/// Failing to list issues aborts the run. A failure while resolving a single
/// issue is logged and counted, and the remaining issues are still processed.
pub fn assign_issues<T, P>(
    tracker: &T,
    resolver: &AssignmentResolver<P>,
) -> Result<AssignmentReport, TrackerError>
where
    T: IssueTracker + ?Sized,
    P: StalenessPolicy,
{
    let issues = tracker.list_issues()?;
    let mut report = AssignmentReport {
        scanned_issues: issues.len(),
        ..AssignmentReport::default()
    };

    for issue in issues.iter().filter(|issue| issue.is_open()) {
        report.open_issues = report.open_issues.saturating_add(1);
        match resolver.try_assign(tracker, issue) {
            Ok(decision) => report.record(&decision),
            Err(failure) => {
                report.failed = report.failed.saturating_add(1);
                error!(issue = issue.number, error = %failure, "assignment pass failed for issue");
            }
        }
    }
    Ok(report)
}
