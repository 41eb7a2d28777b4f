//! Run external commands.

use std::ffi::OsString;
use std::io;

/// Captured result of running an external command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandOutput {
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,

    /// Combined stdout and stderr, lossily converted to UTF-8.
    pub stdout: String,
}

impl CommandOutput {
    /// Whether the command exited successfully.
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands on behalf of the importer.
///
/// The importer only ever runs two fixed commands (`gitlab-ctl show-config`
/// and `gitlab-rake gitlab:import:repos`), so the interface is minimal. It
/// exists so tests can substitute canned output for real processes.
pub trait ProcessRunner {
    /// Run `command` and capture its combined output.
    ///
    /// The first element of `command` is the program; the rest are its
    /// arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the process could not be spawned. A non-zero
    /// exit is not an error; check [`CommandOutput::success()`].
    fn run(&self, command: &[&str]) -> io::Result<CommandOutput>;
}

/// [`ProcessRunner`] that actually executes commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExecRunner;

impl ProcessRunner for ExecRunner {
    fn run(&self, command: &[&str]) -> io::Result<CommandOutput> {
        let (program, args) = command.split_first().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "empty command")
        })?;

        let args: Vec<OsString> =
            args.iter().copied().map(OsString::from).collect();
        let output = duct::cmd(*program, args)
            .stderr_to_stdout()
            .stdout_capture()
            .unchecked()
            .run()?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
