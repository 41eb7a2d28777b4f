//! The import pipeline.

use super::{
    CopyFilter, Error, Ownership, ProjectSettings, Result, chown_recursive,
    copy_filtered,
};
use crate::api::{GitLabApi, Project};
use crate::process::ProcessRunner;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed command that makes GitLab pick up repositories from its storage.
const IMPORT_COMMAND: &[&str] =
    &["gitlab-rake", "-v", "gitlab:import:repos", "RAILS_ENV=production"];

/// Per-repo behavior toggles.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// Rename the copied repo's `hooks` directory to `custom_hooks`.
    pub migrate_hooks: bool,

    /// Remove the destination directory if the copy fails.
    pub remove_on_fail: bool,

    /// Entries to leave out of the copy.
    pub filter: CopyFilter,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            migrate_hooks: true,
            remove_on_fail: false,
            filter: CopyFilter::default(),
        }
    }
}

/// Success and failure tallies for one run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    /// Number of repos imported successfully.
    pub succeeded: usize,

    /// Number of repos that failed.
    pub failed: usize,
}

/// Name of a repository derived from its source path.
///
/// # Example
///
/// ```
/// use assert2::assert;
/// use gitlab_repo_import::import::RepoName;
/// use std::path::Path;
///
/// let name = RepoName::from_path(Path::new("/data/repos/foo.git")).unwrap();
/// assert!(name.project() == "foo");
/// assert!(name.directory() == "foo.git");
///
/// let name = RepoName::from_path(Path::new("/data/repos/bar")).unwrap();
/// assert!(name.project() == "bar");
/// assert!(name.directory() == "bar.git");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepoName {
    /// The project name, without the `.git` suffix.
    project: String,
}

impl RepoName {
    /// Derive the name from the base name of `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` has no usable base name, i.e. it has no
    /// final component, the component is not UTF-8, or nothing is left
    /// after stripping the `.git` suffix.
    pub fn from_path(path: &Path) -> Result<Self> {
        let base = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::BadName(path.to_owned()))?;
        let project = base.strip_suffix(".git").unwrap_or(base);
        if project.is_empty() {
            return Err(Error::BadName(path.to_owned()));
        }
        Ok(Self { project: project.to_owned() })
    }

    /// The project name as it will appear in GitLab.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// The directory name under the group, always with a `.git` suffix.
    #[must_use]
    pub fn directory(&self) -> String {
        format!("{}.git", self.project)
    }
}

/// Find a project by name within a namespace.
#[must_use]
pub fn find_project<'a>(
    projects: &'a [Project],
    namespace: &str,
    name: &str,
) -> Option<&'a Project> {
    projects
        .iter()
        .find(|project| {
            project.name == name && project.namespace.name == namespace
        })
}

/// Imports repositories into GitLab's storage and registers them.
pub struct Importer<'a, A, R> {
    /// Client used to find imported projects and update their settings.
    pub api: &'a A,

    /// Runs the server-side import command.
    pub runner: &'a R,

    /// Root of GitLab's repository storage.
    pub repos_dir: PathBuf,

    /// Owner applied to copied repository files.
    pub ownership: Ownership,

    /// Per-repo behavior toggles.
    pub options: Options,
}

impl<A: GitLabApi, R: ProcessRunner> Importer<'_, A, R> {
    /// Import every repository in `repo_paths` under `group`.
    ///
    /// Failures are per-repo: a repo that cannot be imported is logged and
    /// counted, and processing continues with the next one. Nothing is
    /// retried.
    ///
    /// # Errors
    ///
    /// Returns an error if the group directory does not exist under the
    /// repository storage root. Per-repo failures are reported in the
    /// summary instead.
    pub fn run(
        &self,
        group: &str,
        repo_paths: &[PathBuf],
        settings: &ProjectSettings,
        log: &slog::Logger,
    ) -> Result<RunSummary> {
        slog::info!(log, "Importing repos under group {group:?}");
        let group_dir = self.repos_dir.join(group);
        if !group_dir.exists() {
            return Err(Error::GroupMissing(group_dir));
        }

        let mut summary = RunSummary::default();
        for repo in repo_paths {
            match self.import_one(&group_dir, group, repo, settings, log) {
                Ok(()) => {
                    summary.succeeded = summary.succeeded.saturating_add(1);
                }
                Err(error) => {
                    slog::error!(log, "Error importing {repo:?}: {error}");
                    summary.failed = summary.failed.saturating_add(1);
                }
            }
        }
        Ok(summary)
    }

    /// Import one repository.
    fn import_one(
        &self,
        group_dir: &Path,
        group: &str,
        source: &Path,
        settings: &ProjectSettings,
        log: &slog::Logger,
    ) -> Result<()> {
        if !source.exists() {
            return Err(Error::MissingSource(source.to_owned()));
        }

        let name = RepoName::from_path(source)?;
        let dest = group_dir.join(name.directory());
        if dest.exists() {
            return Err(Error::DestinationExists(dest));
        }

        slog::info!(log, "Copying {source:?} to {dest:?}");
        if let Err(error) = self.copy_repo(source, &dest, log) {
            if self.options.remove_on_fail && dest.exists() {
                slog::warn!(log, "Removing {dest:?}");
                if let Err(remove_error) = fs::remove_dir_all(&dest) {
                    slog::error!(
                        log,
                        "Could not remove {dest:?}: {remove_error}"
                    );
                }
            }
            return Err(error);
        }

        self.trigger_import(log)?;

        let projects = self.api.projects()?;
        let project = find_project(&projects, group, name.project())
            .ok_or_else(|| Error::ProjectNotFound {
                namespace: group.to_owned(),
                name: name.project().to_owned(),
            })?;

        let commits = self.api.commits(project)?;
        if commits.is_empty() {
            slog::warn!(
                log,
                "Project {} created, but has no commits",
                project.path_with_namespace
            );
        } else {
            slog::info!(
                log,
                "Created project with at least {} commits",
                commits.len()
            );
        }

        self.apply_settings(project, settings, log);
        Ok(())
    }

    /// Copy the repository into place, fix ownership, and migrate hooks.
    fn copy_repo(
        &self,
        source: &Path,
        dest: &Path,
        log: &slog::Logger,
    ) -> Result<()> {
        copy_filtered(source, dest, self.options.filter, log)?;
        slog::debug!(log, "Done copying");

        slog::info!(
            log,
            "Recursively setting ownership on {dest:?} to {}:{}",
            self.ownership.uid,
            self.ownership.gid
        );
        chown_recursive(dest, self.ownership)?;
        slog::debug!(log, "Done chown'ing");

        if self.options.migrate_hooks {
            let hooks = dest.join("hooks");
            if hooks.exists() {
                let custom_hooks = dest.join("custom_hooks");
                slog::info!(
                    log,
                    "Migrating hooks - moving {hooks:?} to {custom_hooks:?}"
                );
                fs::rename(&hooks, &custom_hooks)?;
            }
        }

        Ok(())
    }

    /// Run the server-side import command.
    fn trigger_import(&self, log: &slog::Logger) -> Result<()> {
        slog::info!(log, "Running: {}", IMPORT_COMMAND.join(" "));
        let output = self.runner.run(IMPORT_COMMAND)?;
        if !output.success() {
            return Err(Error::ImportCommand {
                code: output.code,
                output: output.stdout,
            });
        }
        slog::debug!(log, "Import output:\n{}", output.stdout);
        Ok(())
    }

    /// Reconcile declarative settings against the project and save changes.
    ///
    /// A failed save is logged but does not fail the repo; by this point
    /// the repository itself has imported successfully.
    fn apply_settings(
        &self,
        project: &Project,
        settings: &ProjectSettings,
        log: &slog::Logger,
    ) {
        slog::info!(
            log,
            "Updating project settings on {}",
            project.path_with_namespace
        );
        let changes = settings.stage(project, log);
        if changes.is_empty() {
            slog::info!(log, "No changes to project settings");
            return;
        }

        match self.api.update_project(project, &changes) {
            Ok(()) => slog::info!(
                log,
                "Settings updated for project {}",
                project.path_with_namespace
            ),
            Err(error) => {
                slog::error!(log, "Saving project settings failed: {error}");
            }
        }
    }
}
