use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use patchbridge_core::DEFAULT_MAINTAINER_TEAM;
use patchbridge_github::{DEFAULT_GITHUB_API_BASE, DEFAULT_REQUEST_TIMEOUT_MS};

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "patchbridge",
    about = "Bridge commit-message issue tags and /assign requests to GitHub issues",
    version
)]
/// Top-level `patchbridge` arguments.
pub struct Cli {
    #[command(flatten)]
    pub github: GithubArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
/// GitHub connection flags shared by every subcommand that talks to the API.
pub struct GithubArgs {
    #[arg(
        long = "github-token",
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        global = true,
        help = "GitHub token used for API access; takes precedence over user/password"
    )]
    pub github_token: Option<String>,

    #[arg(
        long = "github-user",
        env = "PATCHBRIDGE_GITHUB_USER",
        global = true,
        help = "GitHub username for basic authentication when no token is set"
    )]
    pub github_user: Option<String>,

    #[arg(
        long = "github-password",
        env = "PATCHBRIDGE_GITHUB_PASSWORD",
        hide_env_values = true,
        global = true,
        help = "GitHub password for basic authentication when no token is set"
    )]
    pub github_password: Option<String>,

    #[arg(
        long = "github-api-base",
        env = "PATCHBRIDGE_GITHUB_API_BASE",
        default_value = DEFAULT_GITHUB_API_BASE,
        global = true,
        help = "GitHub API base URL"
    )]
    pub github_api_base: String,

    #[arg(
        long = "request-timeout-ms",
        env = "PATCHBRIDGE_REQUEST_TIMEOUT_MS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_MS,
        value_parser = parse_positive_u64,
        global = true,
        help = "Timeout applied to each GitHub API request"
    )]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Subcommand)]
/// Enumerates supported `patchbridge` subcommands.
pub enum Command {
    /// Print the issue references found in a commit message as JSON.
    ParseTags {
        #[arg(
            long,
            help = "Read the commit message from this file instead of stdin"
        )]
        file: Option<PathBuf>,
    },
    /// Resolve `/assign` requests on every open issue of a repository.
    Assign {
        #[arg(
            long,
            env = "PATCHBRIDGE_GITHUB_REPO",
            help = "GitHub repository in owner/repo format"
        )]
        repo: String,

        #[arg(
            long = "maintainer-team",
            env = "PATCHBRIDGE_MAINTAINER_TEAM",
            default_value = DEFAULT_MAINTAINER_TEAM,
            help = "Team mentioned when an assignment request conflicts with existing assignees"
        )]
        maintainer_team: String,
    },
    /// Print the first bot comment on an issue that mentions a patch set.
    BotComment {
        #[arg(
            long,
            env = "PATCHBRIDGE_GITHUB_REPO",
            help = "GitHub repository in owner/repo format"
        )]
        repo: String,

        #[arg(long, help = "Issue number to inspect")]
        issue: u64,

        #[arg(
            long = "bot-name",
            env = "PATCHBRIDGE_BOT_NAME",
            help = "Login of the bot account that posts patch-set comments"
        )]
        bot_name: String,

        #[arg(long = "patch-set", help = "Patch-set number to look for in comment bodies")]
        patch_set: String,
    },
}
