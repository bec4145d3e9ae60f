//! Bounded subprocess execution for the external downloaders.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use super::InvokeError;

const REDACTED: &str = "[REDACTED]";

/// A fully built downloader command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    working_dir: PathBuf,
    stderr_to: Option<PathBuf>,
    timeout: Duration,
    secret_positions: Vec<usize>,
}

impl ToolCommand {
    #[must_use]
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
            stderr_to: None,
            timeout,
            secret_positions: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Appends an argument that is masked whenever the command is displayed.
    #[must_use]
    pub fn secret_arg(mut self, arg: impl Into<String>) -> Self {
        self.secret_positions.push(self.args.len());
        self.args.push(arg.into());
        self
    }

    /// Redirects the child's stderr into `path` (truncated on start).
    #[must_use]
    pub fn stderr_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.stderr_to = Some(path.into());
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn stderr_path(&self) -> Option<&Path> {
        self.stderr_to.as_deref()
    }

    /// Runs the command to completion and returns its exit code.
    ///
    /// The child runs in `working_dir` with stdin closed and inherited stdout.
    /// It is killed when the timeout elapses; files it already wrote stay in place.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError`] on launch failure, timeout or signal termination.
    pub async fn run(&self) -> Result<i32, InvokeError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        if let Some(path) = &self.stderr_to {
            let file = std::fs::File::create(path).map_err(|source| InvokeError::Prepare {
                path: path.clone(),
                source,
            })?;
            command.stderr(Stdio::from(file));
        }

        debug!(command = %self, "spawning downloader");
        let mut child = command
            .spawn()
            .map_err(|source| InvokeError::spawn(&self.program, source))?;

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(source)) => {
                return Err(InvokeError::Wait {
                    program: self.program.clone(),
                    source,
                });
            }
            Err(_) => {
                if let Err(err) = child.kill().await {
                    warn!(program = %self.program, error = %err, "failed to kill timed-out downloader");
                }
                return Err(InvokeError::Timeout {
                    program: self.program.clone(),
                    secs: self.timeout.as_secs(),
                });
            }
        };

        status.code().ok_or_else(|| InvokeError::Terminated {
            program: self.program.clone(),
        })
    }
}

impl fmt::Display for ToolCommand {
    /// Shell-like rendering with secrets masked.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for (index, arg) in self.args.iter().enumerate() {
            let shown = if self.secret_positions.contains(&index) {
                REDACTED
            } else {
                arg.as_str()
            };
            if shown.is_empty() || shown.contains(char::is_whitespace) {
                write!(f, " \"{shown}\"")?;
            } else {
                write!(f, " {shown}")?;
            }
        }
        Ok(())
    }
}
