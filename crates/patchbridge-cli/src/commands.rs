use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use patchbridge_core::{assign_issues, get_bot_comment, parse_issue_number, AssignmentResolver};
use patchbridge_github::{get_client, GithubCredentials, GithubIssueClient, RepoRef};
use tracing::info;

use crate::cli_args::{Cli, Command, GithubArgs};

pub(crate) fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Command::ParseTags { file } => run_parse_tags(file.as_deref()),
        Command::Assign {
            repo,
            maintainer_team,
        } => run_assign(&cli.github, &repo, maintainer_team),
        Command::BotComment {
            repo,
            issue,
            bot_name,
            patch_set,
        } => run_bot_comment(&cli.github, &repo, issue, &bot_name, &patch_set),
    }
}

fn read_commit_message(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read commit message from {}", path.display())),
        None => {
            let mut message = String::new();
            std::io::stdin()
                .read_to_string(&mut message)
                .context("failed to read commit message from stdin")?;
            Ok(message)
        }
    }
}

fn run_parse_tags(file: Option<&Path>) -> Result<()> {
    let message = read_commit_message(file)?;
    let references = parse_issue_number(&message);
    println!(
        "{}",
        serde_json::to_string(&references).context("failed to render issue references")?
    );
    Ok(())
}

fn build_client(github: &GithubArgs, repo: &str) -> Result<GithubIssueClient> {
    let repo = RepoRef::parse(repo)?;
    let credentials = GithubCredentials {
        token: github.github_token.clone(),
        user: github.github_user.clone(),
        password: github.github_password.clone(),
    };
    let client = get_client(
        &credentials,
        &github.github_api_base,
        repo,
        github.request_timeout_ms,
    )?;
    Ok(client)
}

fn run_assign(github: &GithubArgs, repo: &str, maintainer_team: String) -> Result<()> {
    let client = build_client(github, repo)?;
    let resolver = AssignmentResolver::new(maintainer_team);
    info!(repo = %client.repo(), "starting assignment pass");
    let report = assign_issues(&client, &resolver)
        .with_context(|| format!("failed to list issues for {}", client.repo()))?;
    println!(
        "patchbridge assign complete: repo={} scanned={} open={} assigned={} reassigned={} conflicts={} no_request={} failed={}",
        client.repo(),
        report.scanned_issues,
        report.open_issues,
        report.assigned,
        report.reassigned,
        report.conflicts,
        report.no_request,
        report.failed
    );
    Ok(())
}

fn run_bot_comment(
    github: &GithubArgs,
    repo: &str,
    issue: u64,
    bot_name: &str,
    patch_set: &str,
) -> Result<()> {
    let client = build_client(github, repo)?;
    let comment = get_bot_comment(&client, issue, bot_name, patch_set)
        .with_context(|| format!("failed to list comments for {}#{issue}", client.repo()))?;
    match comment {
        Some(comment) => println!(
            "{}",
            serde_json::to_string(&comment).context("failed to render comment")?
        ),
        None => println!("none"),
    }
    Ok(())
}
