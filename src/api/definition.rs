//! API client contract.
//!
//! The types here mirror the subset of the GitLab REST API that the importer
//! touches. [`GitLabApi`] is the seam that lets tests run against
//! [`MockGitLab`](super::mock::MockGitLab) instead of a live server.

use serde::{Deserialize, Serialize};
use std::result;

/// `Result` type for `Error`.
pub type Result<T, E = Error> = result::Result<T, E>;

/// Errors returned by the API client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level error from the HTTP client.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The server answered with an unexpected status.
    #[error("GitLab returned {status} for {url}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// URL of the failed request.
        url: String,
        /// Response body, for the log.
        body: String,
    },
}

/// A project as returned by `/projects`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Project {
    /// Numeric project id.
    pub id: u64,

    /// Project name.
    pub name: String,

    /// Full path, e.g. `group/project`.
    pub path_with_namespace: String,

    /// Namespace (group or user) containing the project.
    pub namespace: Namespace,

    /// Visibility: `private`, `internal`, or `public`.
    pub visibility: String,

    /// Whether issues are enabled.
    pub issues_enabled: bool,

    /// Whether merge requests are enabled.
    pub merge_requests_enabled: bool,

    /// Whether the wiki is enabled.
    pub wiki_enabled: bool,

    /// Whether snippets are enabled.
    pub snippets_enabled: bool,
}

/// The namespace a project lives in.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Namespace {
    /// Namespace name, e.g. the group name.
    pub name: String,
}

/// A commit as returned by `/projects/:id/repository/commits`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Commit {
    /// Full commit hash.
    pub id: String,

    /// First line of the commit message.
    pub title: String,
}

/// Project fields staged for one write.
///
/// `None` fields are left out of the request entirely, so the server keeps
/// their current values.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ProjectChanges {
    /// New visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,

    /// Enable or disable issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues_enabled: Option<bool>,

    /// Enable or disable merge requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_requests_enabled: Option<bool>,

    /// Enable or disable the wiki.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiki_enabled: Option<bool>,

    /// Enable or disable snippets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippets_enabled: Option<bool>,
}

impl ProjectChanges {
    /// Whether nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Minimal interface to the GitLab server.
///
/// Just enough surface for the importer: prove the token works, list what
/// the token can see, and write back a handful of project settings.
pub trait GitLabApi {
    /// Check the token against the API.
    ///
    /// Returns the username of the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    fn authenticate(&self) -> Result<String>;

    /// List every project visible to the authenticated user.
    ///
    /// For an administrator token this is every project on the server.
    ///
    /// # Errors
    ///
    /// Returns an error if any page of the listing cannot be fetched.
    fn projects(&self) -> Result<Vec<Project>>;

    /// List the most recent commits on a project's default branch.
    ///
    /// An empty list means the project has no commits.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn commits(&self, project: &Project) -> Result<Vec<Commit>>;

    /// Write staged changes back to the project.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    fn update_project(
        &self,
        project: &Project,
        changes: &ProjectChanges,
    ) -> Result<()>;
}
