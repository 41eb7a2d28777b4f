//! GitLab server configuration discovery.

use super::{Error, Result};
use crate::process::ProcessRunner;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Repository storage path used when the config omits it.
pub const DEFAULT_REPOS_DIR: &str = "/var/opt/gitlab/git-data/repositories";

/// User and group owning repository files when the config omits them.
pub const DEFAULT_OWNER: &str = "git";

/// Server-side settings needed to place repositories into GitLab storage.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    /// Root of GitLab's repository storage.
    pub repos_dir: PathBuf,

    /// OS user that owns repository files.
    pub user: String,

    /// OS group that owns repository files.
    pub group: String,
}

impl ServerConfig {
    /// Query the server configuration with `gitlab-ctl show-config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be run, exits non-zero, or
    /// does not produce valid JSON. A missing key is not an error; the
    /// documented default is used instead, with a warning.
    pub fn discover<R: ProcessRunner>(
        runner: &R,
        gitlab_ctl: &Path,
        log: &slog::Logger,
    ) -> Result<Self> {
        let program = gitlab_ctl.to_string_lossy();
        let command = format!("{program} show-config");
        slog::info!(log, "Running {command} to get gitlab configuration");

        let output = runner.run(&[program.as_ref(), "show-config"])?;
        if !output.success() {
            return Err(Error::ConfigCommand {
                command,
                code: output.code,
                output: output.stdout,
            });
        }
        slog::debug!(log, "gitlab-ctl done");

        Self::parse(&command, &output.stdout, log)
    }

    /// Parse the JSON document emitted by `gitlab-ctl show-config`.
    ///
    /// `command` only appears in error and log messages.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not valid JSON.
    pub fn parse(
        command: &str,
        json: &str,
        log: &slog::Logger,
    ) -> Result<Self> {
        let conf: Value = serde_json::from_str(json).map_err(|source| {
            Error::ConfigJson { command: command.to_owned(), source }
        })?;

        let repos_dir = match lookup(
            &conf,
            "/gitlab/gitlab-rails/gitlab_shell_repos_path",
        ) {
            Some(path) => {
                slog::info!(log, "Found repos path from config as: {path}");
                PathBuf::from(path)
            }
            None => {
                slog::warn!(
                    log,
                    "Could not find gitlab_shell_repos_path in config, using \
                    default of: {DEFAULT_REPOS_DIR}"
                );
                PathBuf::from(DEFAULT_REPOS_DIR)
            }
        };

        let user = match lookup(&conf, "/gitlab/user/username") {
            Some(user) => {
                slog::info!(log, "Found gitlab username from config as: {user}");
                user.to_owned()
            }
            None => {
                slog::warn!(
                    log,
                    "Could not find gitlab username in config, using default \
                    of: {DEFAULT_OWNER}"
                );
                DEFAULT_OWNER.to_owned()
            }
        };

        let group = match lookup(&conf, "/gitlab/user/group") {
            Some(group) => {
                slog::info!(log, "Found gitlab group from config as: {group}");
                group.to_owned()
            }
            None => {
                slog::warn!(
                    log,
                    "Could not find gitlab group in config, using default \
                    of: {DEFAULT_OWNER}"
                );
                DEFAULT_OWNER.to_owned()
            }
        };

        Ok(Self { repos_dir, user, group })
    }
}

/// Look up a string value by JSON pointer.
fn lookup<'a>(conf: &'a Value, pointer: &str) -> Option<&'a str> {
    conf.pointer(pointer).and_then(Value::as_str)
}
