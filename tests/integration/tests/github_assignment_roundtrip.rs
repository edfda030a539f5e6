use chrono::{DateTime, Utc};
use httpmock::prelude::*;
use patchbridge_core::{
    assign_issues, get_bot_comment, issue_age_days, AssignmentReport, AssignmentResolver,
    TrackerIssue, DEFAULT_MAINTAINER_TEAM,
};
use patchbridge_github::{get_client, GithubCredentials, GithubIssueClient, RepoRef};
use serde_json::{json, Value};

fn token_client(server: &MockServer) -> GithubIssueClient {
    let credentials = GithubCredentials {
        token: Some("integration-token".to_string()),
        ..GithubCredentials::default()
    };
    get_client(
        &credentials,
        &server.base_url(),
        RepoRef::parse("airshipit/airshipctl").expect("repo"),
        5_000,
    )
    .expect("client")
}

fn issue_payload(number: u64, state: &str, assignees: &[&str]) -> Value {
    json!({
        "number": number,
        "title": format!("issue {number}"),
        "state": state,
        "assignees": assignees
            .iter()
            .map(|login| json!({"login": login}))
            .collect::<Vec<_>>(),
        "created_at": "2023-06-01T00:00:00Z"
    })
}

fn comment_payload(id: u64, login: &str, body: &str) -> Value {
    json!({
        "id": id,
        "body": body,
        "created_at": "2023-06-02T00:00:00Z",
        "user": {"login": login}
    })
}

#[test]
fn integration_assign_issues_resolves_each_open_issue_through_github_api() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repos/airshipit/airshipctl/issues");
        then.status(200).json_body(json!([
            issue_payload(1, "open", &[]),
            issue_payload(2, "open", &["bob"]),
            issue_payload(3, "open", &[]),
            issue_payload(4, "closed", &[]),
        ]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/airshipit/airshipctl/issues/1/comments");
        then.status(200).json_body(json!([
            comment_payload(10, "dan", "/assign"),
            comment_payload(11, "alice", "actually, /assign me instead"),
        ]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/airshipit/airshipctl/issues/2/comments");
        then.status(200)
            .json_body(json!([comment_payload(20, "carol", "/assign")]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/airshipit/airshipctl/issues/3/comments");
        then.status(200)
            .json_body(json!([comment_payload(30, "erin", "is this still open?")]));
    });
    let assign_alice = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/airshipit/airshipctl/issues/1/assignees")
            .json_body(json!({"assignees": ["alice"]}));
        then.status(201).json_body(json!({"number": 1}));
    });
    let assigned_comment = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/airshipit/airshipctl/issues/1/comments")
            .json_body(json!({"body": "assigned alice"}));
        then.status(201).json_body(json!({"id": 12}));
    });
    let conflict_comment = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/airshipit/airshipctl/issues/2/comments")
            .json_body(json!({
                "body": "Unable to assign carol. Please contact a member of the @airshipit/airship-cores team for help with assignments."
            }));
        then.status(201).json_body(json!({"id": 21}));
    });
    let unexpected_assignees = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/airshipit/airshipctl/issues/2/assignees");
        then.status(201).json_body(json!({"number": 2}));
    });
    let closed_issue_comments = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/airshipit/airshipctl/issues/4/comments");
        then.status(200).json_body(json!([]));
    });

    let resolver = AssignmentResolver::new(DEFAULT_MAINTAINER_TEAM);
    let report = assign_issues(&token_client(&server), &resolver).expect("assign issues");

    assert_eq!(
        report,
        AssignmentReport {
            scanned_issues: 4,
            open_issues: 3,
            assigned: 1,
            reassigned: 0,
            conflicts: 1,
            no_request: 1,
            failed: 0,
        }
    );
    assign_alice.assert_calls(1);
    assigned_comment.assert_calls(1);
    conflict_comment.assert_calls(1);
    unexpected_assignees.assert_calls(0);
    closed_issue_comments.assert_calls(0);
}

#[test]
fn integration_assign_issues_isolates_tracker_failures_per_issue() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repos/airshipit/airshipctl/issues");
        then.status(200).json_body(json!([
            issue_payload(1, "open", &[]),
            issue_payload(2, "open", &[]),
        ]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/airshipit/airshipctl/issues/1/comments");
        then.status(200)
            .json_body(json!([comment_payload(10, "alice", "/assign")]));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/repos/airshipit/airshipctl/issues/1/assignees");
        then.status(403).body("Resource not accessible by integration");
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/airshipit/airshipctl/issues/2/comments");
        then.status(200)
            .json_body(json!([comment_payload(20, "bob", "/assign")]));
    });
    let second_assign = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/airshipit/airshipctl/issues/2/assignees")
            .json_body(json!({"assignees": ["bob"]}));
        then.status(201).json_body(json!({"number": 2}));
    });
    let second_comment = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/airshipit/airshipctl/issues/2/comments")
            .json_body(json!({"body": "assigned bob"}));
        then.status(201).json_body(json!({"id": 21}));
    });

    let resolver = AssignmentResolver::new(DEFAULT_MAINTAINER_TEAM);
    let report = assign_issues(&token_client(&server), &resolver).expect("assign issues");

    assert_eq!(report.failed, 1);
    assert_eq!(report.assigned, 1);
    second_assign.assert_calls(1);
    second_comment.assert_calls(1);
}

#[test]
fn integration_assign_issues_propagates_issue_listing_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repos/airshipit/airshipctl/issues");
        then.status(500).body("boom");
    });

    let resolver = AssignmentResolver::new(DEFAULT_MAINTAINER_TEAM);
    let error = assign_issues(&token_client(&server), &resolver)
        .expect_err("listing failure should abort");
    assert_eq!(error.operation(), Some("list issues"));
}

#[test]
fn integration_staleness_policy_reassigns_through_github_api() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repos/airshipit/airshipctl/issues");
        then.status(200)
            .json_body(json!([issue_payload(5, "open", &["bob"])]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/airshipit/airshipctl/issues/5/comments");
        then.status(200)
            .json_body(json!([comment_payload(50, "carol", "/assign")]));
    });
    let remove = server.mock(|when, then| {
        when.method(DELETE)
            .path("/repos/airshipit/airshipctl/issues/5/assignees")
            .json_body(json!({"assignees": ["bob"]}));
        then.status(200).json_body(json!({"number": 5}));
    });
    let add = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/airshipit/airshipctl/issues/5/assignees")
            .json_body(json!({"assignees": ["carol"]}));
        then.status(201).json_body(json!({"number": 5}));
    });
    let comment = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/airshipit/airshipctl/issues/5/comments")
            .json_body(json!({"body": "unassigned: bob\nassigned: carol"}));
        then.status(201).json_body(json!({"id": 51}));
    });

    let resolver = AssignmentResolver::new(DEFAULT_MAINTAINER_TEAM).with_staleness_policy(
        |issue: &TrackerIssue, now: DateTime<Utc>| issue_age_days(issue, now) > 30,
    );
    let report = assign_issues(&token_client(&server), &resolver).expect("assign issues");

    assert_eq!(report.reassigned, 1);
    remove.assert_calls(1);
    add.assert_calls(1);
    comment.assert_calls(1);
}

#[test]
fn integration_get_bot_comment_reads_comments_from_github() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/airshipit/airshipctl/issues/9/comments");
        then.status(200).json_body(json!([
            comment_payload(90, "alice", "patch set 4 please"),
            comment_payload(91, "airship-bot", "https://review.example/c/123 patch set 4"),
        ]));
    });

    let client = token_client(&server);
    let found = get_bot_comment(&client, 9, "airship-bot", "patch set 4")
        .expect("lookup")
        .expect("comment");
    assert_eq!(found.id, 91);
    assert!(get_bot_comment(&client, 9, "airship-bot", "patch set 5")
        .expect("lookup")
        .is_none());
}
