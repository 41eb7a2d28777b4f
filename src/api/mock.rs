//! Mock implementation of the API client for testing.

use super::definition::{
    Commit, Error, GitLabApi, Namespace, Project, ProjectChanges, Result,
};
use std::cell::{Cell, RefCell};

/// Mock client backed by an in-memory project list.
///
/// [`GitLabApi::update_project()`] applies staged changes to the stored
/// project, so tests can check that settings reconciliation converges.
#[derive(Clone, Debug, Default)]
pub struct MockGitLab {
    /// Username reported by [`GitLabApi::authenticate()`].
    pub username: String,

    /// Projects visible through the API.
    pub projects: RefCell<Vec<Project>>,

    /// Commits reported for every project.
    pub commits: Vec<Commit>,

    /// Number of times [`GitLabApi::update_project()`] was called.
    pub update_calls: Cell<usize>,

    /// Make [`GitLabApi::update_project()`] fail.
    pub fail_update: bool,
}

impl MockGitLab {
    /// Create a mock with no projects.
    #[must_use]
    pub fn new() -> Self {
        Self { username: "admin".to_owned(), ..Self::default() }
    }

    /// Create a mock that can see `projects`.
    #[must_use]
    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self { projects: RefCell::new(projects), ..Self::new() }
    }
}

/// Build a project record like the GitLab API would return.
///
/// Private with every feature enabled, i.e. GitLab's defaults.
#[must_use]
pub fn project(namespace: &str, name: &str) -> Project {
    Project {
        id: 1,
        name: name.to_owned(),
        path_with_namespace: format!("{namespace}/{name}"),
        namespace: Namespace { name: namespace.to_owned() },
        visibility: "private".to_owned(),
        issues_enabled: true,
        merge_requests_enabled: true,
        wiki_enabled: true,
        snippets_enabled: true,
    }
}

impl GitLabApi for MockGitLab {
    fn authenticate(&self) -> Result<String> {
        Ok(self.username.clone())
    }

    fn projects(&self) -> Result<Vec<Project>> {
        Ok(self.projects.borrow().clone())
    }

    fn commits(&self, _project: &Project) -> Result<Vec<Commit>> {
        Ok(self.commits.clone())
    }

    fn update_project(
        &self,
        project: &Project,
        changes: &ProjectChanges,
    ) -> Result<()> {
        if self.fail_update {
            return Err(Error::Status {
                status: 500,
                url: "mock".to_owned(),
                body: "mock failure".to_owned(),
            });
        }

        self.update_calls.set(self.update_calls.get().saturating_add(1));

        let mut projects = self.projects.borrow_mut();
        let Some(stored) =
            projects.iter_mut().find(|stored| stored.id == project.id)
        else {
            return Err(Error::Status {
                status: 404,
                url: "mock".to_owned(),
                body: "404 Project Not Found".to_owned(),
            });
        };

        if let Some(visibility) = &changes.visibility {
            stored.visibility = visibility.clone();
        }
        if let Some(enabled) = changes.issues_enabled {
            stored.issues_enabled = enabled;
        }
        if let Some(enabled) = changes.merge_requests_enabled {
            stored.merge_requests_enabled = enabled;
        }
        if let Some(enabled) = changes.wiki_enabled {
            stored.wiki_enabled = enabled;
        }
        if let Some(enabled) = changes.snippets_enabled {
            stored.snippets_enabled = enabled;
        }

        Ok(())
    }
}
