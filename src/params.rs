//! Code to deal with executable parameters.
#![allow(clippy::allow_attributes, reason = "framework code from a template")]

use gitlab_repo_import::import::{
    CopyFilter, Options, ProjectSettings, Visibility,
};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

pub use clap::Parser;

/// Import existing bare git repositories into GitLab
#[derive(Debug, clap::Parser)]
#[clap(version, about)]
pub struct Params {
    /// Whether or not to output in color
    #[clap(long, default_value = "auto", value_name = "WHEN")]
    pub color: ColorChoice,

    /// Verbosity (may be repeated up to three times)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// URL of the GitLab instance
    #[arg(short = 'u', long, default_value = "http://127.0.0.1")]
    pub gitlab_url: String,

    /// Group name to import projects under
    #[arg(short, long)]
    pub group: String,

    /// GitLab private API token (must have admin rights; prompts if unset)
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Path to the gitlab-ctl executable
    #[arg(long, default_value = "/bin/gitlab-ctl", value_name = "PATH")]
    pub gitlab_ctl: PathBuf,

    /// Path to GitLab's repository storage directory (queried with
    /// `gitlab-ctl show-config` if unset)
    #[arg(long, value_name = "DIR")]
    pub repos_dir: Option<PathBuf>,

    /// Do not rename the copied repo's hooks directory to custom_hooks
    #[arg(long = "no-migrate-hooks", action = clap::ArgAction::SetFalse)]
    pub migrate_hooks: bool,

    /// Remove the destination directory if the copy fails
    #[arg(long)]
    pub remove_on_fail: bool,

    /// Skip broken symlinks in the source repo when copying
    #[arg(long)]
    pub ignore_broken_links: bool,

    /// Skip refs/remotes/* content in the source repo (e.g. from gitolite)
    #[arg(long)]
    pub ignore_refs_remotes: bool,

    /// Set visibility of imported projects (default: leave as-is)
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub visibility: Option<Visibility>,

    /// Enable issues on imported projects, regardless of the GitLab default
    #[arg(long, conflicts_with = "disable_issues")]
    pub enable_issues: bool,

    /// Disable issues on imported projects, regardless of the GitLab default
    #[arg(long)]
    pub disable_issues: bool,

    /// Enable merge requests on imported projects
    #[arg(long, conflicts_with = "disable_merge_requests")]
    pub enable_merge_requests: bool,

    /// Disable merge requests on imported projects
    #[arg(long)]
    pub disable_merge_requests: bool,

    /// Enable the wiki on imported projects
    #[arg(long, conflicts_with = "disable_wiki")]
    pub enable_wiki: bool,

    /// Disable the wiki on imported projects
    #[arg(long)]
    pub disable_wiki: bool,

    /// Enable snippets on imported projects
    #[arg(long, conflicts_with = "disable_snippets")]
    pub enable_snippets: bool,

    /// Disable snippets on imported projects
    #[arg(long)]
    pub disable_snippets: bool,

    /// Local filesystem paths of bare repositories to import
    #[arg(value_name = "REPO_PATH", required = true)]
    pub repo_path: Vec<PathBuf>,
}

impl Params {
    /// Behavior toggles for the importer.
    #[must_use]
    pub fn options(&self) -> Options {
        Options {
            migrate_hooks: self.migrate_hooks,
            remove_on_fail: self.remove_on_fail,
            filter: CopyFilter {
                ignore_broken_links: self.ignore_broken_links,
                ignore_refs_remotes: self.ignore_refs_remotes,
            },
        }
    }

    /// Project settings targets from the enable/disable flag pairs.
    #[must_use]
    pub fn settings(&self) -> ProjectSettings {
        ProjectSettings {
            visibility: self.visibility,
            issues: toggle(self.enable_issues, self.disable_issues),
            merge_requests: toggle(
                self.enable_merge_requests,
                self.disable_merge_requests,
            ),
            wiki: toggle(self.enable_wiki, self.disable_wiki),
            snippets: toggle(self.enable_snippets, self.disable_snippets),
        }
    }

    /// Print a warning message in error color to `err_stream()`.
    pub fn warn<S: AsRef<str>>(&self, message: S) -> io::Result<()> {
        let mut err_out = self.err_stream();
        err_out.set_color(&error_color())?;
        err_out.write_all(message.as_ref().as_bytes())?;
        err_out.reset()?;

        Ok(())
    }

    /// Get stream to use for standard output.
    #[allow(dead_code, reason = "framework code")]
    pub fn out_stream(&self) -> StandardStream {
        StandardStream::stdout(self.color_choice(&io::stdout()))
    }

    /// Get stream to use for errors.
    pub fn err_stream(&self) -> StandardStream {
        StandardStream::stderr(self.color_choice(&io::stderr()))
    }

    /// Whether or not to output on a stream in color.
    ///
    /// Checks if passed stream is a terminal.
    pub fn color_choice<T: IsTerminal>(
        &self,
        stream: &T,
    ) -> termcolor::ColorChoice {
        if self.color == ColorChoice::Auto && !stream.is_terminal() {
            termcolor::ColorChoice::Never
        } else {
            self.color.into()
        }
    }
}

/// Convert an enable/disable flag pair to a target value.
fn toggle(enable: bool, disable: bool) -> Option<bool> {
    if enable {
        Some(true)
    } else if disable {
        Some(false)
    } else {
        None
    }
}

/// Whether or not to output in color
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum ColorChoice {
    /// Output in color when running in a terminal that supports it
    #[default]
    Auto,

    /// Always output in color
    Always,

    /// Never output in color
    Never,
}

impl From<ColorChoice> for termcolor::ColorChoice {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => Self::Auto,
            ColorChoice::Always => Self::Always,
            ColorChoice::Never => Self::Never,
        }
    }
}

/// Returns color used to output errors.
pub fn error_color() -> ColorSpec {
    let mut color = ColorSpec::new();
    color.set_fg(Some(Color::Red));
    color.set_intense(true);
    color
}
