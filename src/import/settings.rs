//! Declarative project settings applied after import.

use crate::api::{Project, ProjectChanges};

/// Visibility of a GitLab project.
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum Visibility {
    /// Only members can see the project.
    Private,

    /// Any authenticated user can see the project.
    Internal,

    /// Anyone can see the project.
    Public,
}

impl Visibility {
    /// The value as it appears on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Internal => "internal",
            Self::Public => "public",
        }
    }
}

/// Target settings for imported projects.
///
/// `None` means leave the setting as-is.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ProjectSettings {
    /// Target visibility.
    pub visibility: Option<Visibility>,

    /// Whether issues should be enabled.
    pub issues: Option<bool>,

    /// Whether merge requests should be enabled.
    pub merge_requests: Option<bool>,

    /// Whether the wiki should be enabled.
    pub wiki: Option<bool>,

    /// Whether snippets should be enabled.
    pub snippets: Option<bool>,
}

impl ProjectSettings {
    /// Compare targets against the project's current state and stage what
    /// differs.
    ///
    /// Settings already at their target value are skipped, so staging
    /// against an up-to-date project produces an empty change set and no
    /// write needs to happen.
    #[must_use]
    pub fn stage(
        &self,
        project: &Project,
        log: &slog::Logger,
    ) -> ProjectChanges {
        let mut changes = ProjectChanges::default();

        if let Some(visibility) = self.visibility {
            if project.visibility == visibility.as_str() {
                slog::debug!(
                    log,
                    "visibility already at desired value: {}",
                    visibility.as_str()
                );
            } else {
                slog::debug!(
                    log,
                    "Setting visibility to {} (current={})",
                    visibility.as_str(),
                    project.visibility
                );
                changes.visibility = Some(visibility.as_str().to_owned());
            }
        }

        changes.issues_enabled =
            stage_flag("issues", self.issues, project.issues_enabled, log);
        changes.merge_requests_enabled = stage_flag(
            "merge_requests",
            self.merge_requests,
            project.merge_requests_enabled,
            log,
        );
        changes.wiki_enabled =
            stage_flag("wiki", self.wiki, project.wiki_enabled, log);
        changes.snippets_enabled = stage_flag(
            "snippets",
            self.snippets,
            project.snippets_enabled,
            log,
        );

        changes
    }
}

/// Stage one boolean feature flag, skipping values already in place.
fn stage_flag(
    name: &str,
    target: Option<bool>,
    current: bool,
    log: &slog::Logger,
) -> Option<bool> {
    let target = target?;
    if target == current {
        slog::debug!(log, "{name} already at desired value: {target}");
        None
    } else {
        slog::debug!(log, "Setting {name} to {target} (current={current})");
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock;
    use crate::test::discard_log;
    use assert2::assert;

    #[test]
    fn stage_nothing_by_default() {
        let project = mock::project("eng", "foo");
        let changes =
            ProjectSettings::default().stage(&project, &discard_log());
        assert!(changes.is_empty());
    }

    #[test]
    fn stage_skips_values_already_in_place() {
        // mock::project() is private with everything enabled.
        let project = mock::project("eng", "foo");
        let settings = ProjectSettings {
            visibility: Some(Visibility::Private),
            issues: Some(true),
            wiki: Some(true),
            ..ProjectSettings::default()
        };
        assert!(settings.stage(&project, &discard_log()).is_empty());
    }

    #[test]
    fn stage_visibility_and_issues() {
        let project = mock::project("eng", "foo");
        let settings = ProjectSettings {
            visibility: Some(Visibility::Public),
            issues: Some(false),
            ..ProjectSettings::default()
        };

        let changes = settings.stage(&project, &discard_log());
        assert!(
            changes
                == ProjectChanges {
                    visibility: Some("public".to_owned()),
                    issues_enabled: Some(false),
                    ..ProjectChanges::default()
                }
        );
    }

    #[test]
    fn staged_changes_serialize_sparsely() {
        let changes = ProjectChanges {
            visibility: Some("public".to_owned()),
            issues_enabled: Some(false),
            ..ProjectChanges::default()
        };
        assert!(
            serde_json::to_string(&changes).unwrap()
                == r#"{"visibility":"public","issues_enabled":false}"#
        );
    }
}
