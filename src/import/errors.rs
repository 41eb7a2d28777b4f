//! Errors encountered by the importer.

use std::io;
use std::path::PathBuf;
use std::result;

/// `Result` type for `Error`.
pub type Result<T, E = Error> = result::Result<T, E>;

/// Errors encountered by the importer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration command exited non-zero.
    #[error("{command} failed (exit {code:?}):\n{output}")]
    ConfigCommand {
        /// The command that was run.
        command: String,
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Captured output of the command.
        output: String,
    },

    /// The configuration command did not produce valid JSON.
    #[error("unable to read JSON output from {command}")]
    ConfigJson {
        /// The command that was run.
        command: String,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// The user owning repository files does not exist locally.
    #[error(
        "could not find uid for user {0:?}; only a local GitLab user is \
        supported"
    )]
    UnknownUser(String),

    /// The group owning repository files does not exist locally.
    #[error(
        "could not find gid for group {0:?}; only a local GitLab group is \
        supported"
    )]
    UnknownGroup(String),

    /// The group directory under the repository storage root is missing.
    #[error("group does not yet exist (path {0:?} does not exist)")]
    GroupMissing(PathBuf),

    /// The source repository path is missing.
    #[error("repo path does not exist: {0:?}")]
    MissingSource(PathBuf),

    /// The repository name could not be derived from the source path.
    #[error("cannot determine repository name from {0:?}")]
    BadName(PathBuf),

    /// The destination path already exists.
    #[error("path already exists: {0:?}")]
    DestinationExists(PathBuf),

    /// The import command exited non-zero.
    #[error("import failed (exit {code:?}):\n{output}")]
    ImportCommand {
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Captured output of the command.
        output: String,
    },

    /// The import command succeeded but the project is not visible.
    #[error(
        "import command exited successfully, but could not find project \
        {namespace}/{name} via API"
    )]
    ProjectNotFound {
        /// The namespace the project was expected in.
        namespace: String,
        /// The expected project name.
        name: String,
    },

    /// An error from the API client.
    #[error(transparent)]
    Api(#[from] crate::api::Error),

    /// An IO error.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// An error encountered walking a directory tree.
    #[error(transparent)]
    Walkdir(#[from] walkdir::Error),
}
