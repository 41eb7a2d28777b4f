//! gitlab-repo-import executable.

use anyhow::bail;
use gitlab_repo_import::api::{GitLabApi, GitLabClient};
use gitlab_repo_import::import::{Importer, Ownership, ServerConfig};
use gitlab_repo_import::process::ExecRunner;
use std::io::{self, Write};
use std::process::ExitCode;

mod logging;
mod params;

use params::{Params, Parser};

/// Wrapper to handle errors.
///
/// See [`cli()`].
fn main() -> ExitCode {
    let params = Params::parse();
    cli(&params).unwrap_or_else(|error| {
        let error = format!("{error}\n");
        if error.to_lowercase().starts_with("error") {
            params.warn(error).unwrap();
        } else {
            params.warn(format!("Error: {error}")).unwrap();
        }

        ExitCode::FAILURE
    })
}

/// Do the actual work.
///
/// Returns the exit code to use.
///
/// # Errors
///
/// This returns fatal errors (configuration, authentication) so that they
/// can be outputted nicely in [`main()`]. Per-repo failures are reported in
/// the summary instead, and only affect the exit code.
fn cli(params: &Params) -> anyhow::Result<ExitCode> {
    let log = logging::init(params.verbose)?;

    slog::debug!(log, "Connecting to GitLab at {}", params.gitlab_url);
    let api = GitLabClient::new(&params.gitlab_url, &api_token(params)?)?;
    let username = api.authenticate()?;
    slog::info!(log, "Connected to GitLab as {username}");

    let runner = ExecRunner;
    let mut config = ServerConfig::discover(&runner, &params.gitlab_ctl, &log)?;
    if let Some(repos_dir) = &params.repos_dir {
        config.repos_dir = repos_dir.clone();
    }

    let ownership = Ownership::resolve(&config.user, &config.group)?;
    slog::info!(
        log,
        "Git repo ownership: {}:{} ({}:{})",
        config.user,
        config.group,
        ownership.uid,
        ownership.gid
    );

    let importer = Importer {
        api: &api,
        runner: &runner,
        repos_dir: config.repos_dir,
        ownership,
        options: params.options(),
    };

    let summary =
        importer.run(&params.group, &params.repo_path, &params.settings(), &log)?;
    slog::info!(
        log,
        "Done with all repos; imported {}, {} failed",
        summary.succeeded,
        summary.failed
    );

    if summary.failed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Get the API token from the command line, the environment, or by prompting.
///
/// # Errors
///
/// Returns an error if reading from stdin fails or the operator enters an
/// empty token.
fn api_token(params: &Params) -> anyhow::Result<String> {
    if let Some(token) = &params.token {
        return Ok(token.clone());
    }

    eprint!("Enter your GitLab private API token: ");
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let token = input.trim();
    if token.is_empty() {
        bail!("No API token provided");
    }

    Ok(token.to_owned())
}
