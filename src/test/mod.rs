//! Test helpers for both unit and integration tests

use crate::process::{CommandOutput, ProcessRunner};
use bstr::ByteSlice;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Logger that throws everything away.
#[must_use]
pub fn discard_log() -> slog::Logger {
    slog::Logger::root(slog::Discard, slog::o!())
}

/// [`ProcessRunner`] that replays canned outputs instead of running
/// anything.
#[derive(Debug, Default)]
pub struct StubRunner {
    /// Commands received, in order.
    pub calls: RefCell<Vec<Vec<String>>>,

    /// Outputs to replay, in order. When exhausted, commands succeed with
    /// empty output.
    pub outputs: RefCell<VecDeque<CommandOutput>>,
}

impl StubRunner {
    /// Queue an output to replay.
    pub fn push_output(&self, code: Option<i32>, stdout: &str) {
        self.outputs.borrow_mut().push_back(CommandOutput {
            code,
            stdout: stdout.to_owned(),
        });
    }
}

impl ProcessRunner for StubRunner {
    fn run(&self, command: &[&str]) -> io::Result<CommandOutput> {
        self.calls
            .borrow_mut()
            .push(command.iter().map(|&arg| arg.to_owned()).collect());
        Ok(self.outputs.borrow_mut().pop_front().unwrap_or(CommandOutput {
            code: Some(0),
            stdout: String::new(),
        }))
    }
}

/// A scratch directory that doubles as `$HOME` for `git` operations.
///
/// Source trees, destination storage, and bare repos for a test all live
/// under one of these.
#[derive(Debug)]
pub struct Home(PathBuf);

impl Home {
    /// Make `path` usable as a home directory for `git`.
    ///
    /// Writes a `.gitconfig` with `user.name`/`user.email` (commits fail
    /// without them on CI) and `init.defaultBranch` (avoids the default
    /// branch warning).
    ///
    /// # Panics
    ///
    /// Panics if the directory or `.gitconfig` cannot be created.
    pub fn init<P: Into<PathBuf>>(path: P) -> Self {
        let home = Self(path.into());
        home.write(
            ".gitconfig",
            "[user]\n\
            name = Name\n\
            email = name@example.com\n\
            [init]\n\
            defaultBranch = main\n\
            [advice]\n\
            detachedHead = false\n\
            skippedCherryPicks = false\n",
        );
        home
    }

    /// Get the path to the home directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Join a path to this directory.
    #[must_use]
    pub fn join<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.0.join(path)
    }

    /// Make a subdirectory, with any missing parents.
    pub fn mkdir<P: AsRef<Path>>(&self, path: P) {
        fs::create_dir_all(self.join(path)).unwrap();
    }

    /// Write a file, creating any missing parent directories.
    pub fn write<P: AsRef<Path>>(&self, path: P, content: &str) {
        let path = self.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Create a symlink at `link` pointing to `original`.
    ///
    /// `original` is used verbatim, so a relative path is resolved
    /// relative to the link's own directory. Creates the link's parent
    /// directories if necessary.
    #[cfg(unix)]
    pub fn symlink<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        original: P,
        link: Q,
    ) {
        let link = self.join(link);
        fs::create_dir_all(link.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(original, link).unwrap();
    }

    /// Run `git` with this directory as `$HOME` and panic on errors.
    ///
    /// Prints the `git` command line and its output to stdout so failures
    /// are easy to diagnose.
    ///
    /// # Panics
    ///
    /// Panics if `git` cannot be run or exits non-zero.
    pub fn git<I, S>(&self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let shell_args =
            shell_words::join(args.iter().map(|arg| arg.to_string_lossy()));
        println!("`git {shell_args}` in {:?}", self.path());

        let output = duct::cmd("git", args)
            .dir(self.path())
            .env("HOME", self.path())
            .env("GIT_CONFIG_GLOBAL", self.join(".gitconfig"))
            .env("GIT_CONFIG_SYSTEM", "/dev/null")
            .stderr_to_stdout()
            .stdout_capture()
            .run()
            .unwrap();
        print!("{}", output.stdout.as_bstr());
    }

    /// Create a bare git repository and return its path.
    ///
    /// # Panics
    ///
    /// Panics if there was a problem creating the repository.
    #[must_use]
    pub fn git_init_bare<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let path = self.join(path);
        self.git([
            OsString::from("init"),
            OsString::from("--bare"),
            path.clone().into_os_string(),
        ]);
        path
    }
}
