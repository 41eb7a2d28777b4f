//! Production implementation of the API client.
//!
//! A thin wrapper over the GitLab v4 REST API using a blocking HTTP client;
//! the import pipeline is strictly sequential, so there is nothing to gain
//! from an async client here.

use super::definition::{
    Commit, Error, GitLabApi, Project, ProjectChanges, Result,
};
use serde::Deserialize;

/// Header GitLab uses for private token authentication.
const PRIVATE_TOKEN: &str = "PRIVATE-TOKEN";

/// Page size used when listing projects.
const PER_PAGE: usize = 100;

/// Client for a GitLab instance.
#[derive(Clone)]
pub struct GitLabClient {
    /// Base URL of the GitLab instance, without a trailing slash.
    base_url: String,

    /// Private API token.
    token: String,

    /// The underlying HTTP client.
    http: reqwest::blocking::Client,
}

impl GitLabClient {
    /// Create a client for the GitLab instance at `base_url`.
    ///
    /// This does not touch the network; call
    /// [`authenticate()`](GitLabApi::authenticate) to verify the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
            http: reqwest::blocking::Client::builder().build()?,
        })
    }

    /// GET a path under the instance root, with query parameters.
    fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::blocking::Response> {
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .header(PRIVATE_TOKEN, &self.token)
            .query(query)
            .send()?;
        check_status(response)
    }
}

impl GitLabApi for GitLabClient {
    fn authenticate(&self) -> Result<String> {
        /// Subset of the `/user` response.
        #[derive(Debug, Deserialize)]
        struct User {
            /// Login name of the token's user.
            username: String,
        }

        let user: User = self.get("/api/v4/user", &[])?.json()?;
        Ok(user.username)
    }

    fn projects(&self) -> Result<Vec<Project>> {
        let mut projects: Vec<Project> = Vec::new();
        for page in 1.. {
            let batch: Vec<Project> = self
                .get(
                    "/api/v4/projects",
                    &[
                        ("per_page", PER_PAGE.to_string()),
                        ("page", page.to_string()),
                    ],
                )?
                .json()?;
            let last = batch.len() < PER_PAGE;
            projects.extend(batch);
            if last {
                break;
            }
        }
        Ok(projects)
    }

    fn commits(&self, project: &Project) -> Result<Vec<Commit>> {
        // A project whose repository has no commits at all answers 404
        // rather than an empty list.
        let path =
            format!("/api/v4/projects/{}/repository/commits", project.id);
        match self.get(&path, &[]) {
            Ok(response) => Ok(response.json()?),
            Err(Error::Status { status: 404, .. }) => Ok(Vec::new()),
            Err(error) => Err(error),
        }
    }

    fn update_project(
        &self,
        project: &Project,
        changes: &ProjectChanges,
    ) -> Result<()> {
        let response = self
            .http
            .put(format!("{}/api/v4/projects/{}", self.base_url, project.id))
            .header(PRIVATE_TOKEN, &self.token)
            .json(changes)
            .send()?;
        check_status(response)?;
        Ok(())
    }
}

/// Convert a non-2xx response into [`Error::Status`].
fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let url = response.url().to_string();
        Err(Error::Status {
            status: status.as_u16(),
            url,
            body: response.text().unwrap_or_default(),
        })
    }
}
