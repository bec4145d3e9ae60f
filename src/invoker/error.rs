//! Error types for downloader invocations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that end a downloader invocation without a normal exit status.
///
/// Every variant maps to exit code 1 for the calling phase.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The target or `.errors` directory could not be prepared.
    #[error("failed to prepare '{path}': {source}\n  Suggestion: Check that the output directory is writable")]
    Prepare {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The executable could not be launched.
    #[error("failed to launch '{program}': {source}\n  Suggestion: {suggestion}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
        suggestion: &'static str,
    },

    /// Waiting on the child process failed.
    #[error("failed waiting for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The child exceeded its wall-clock budget and was killed.
    #[error("'{program}' timed out after {secs}s\n  Suggestion: Raise the phase timeout or split the playlist")]
    Timeout { program: String, secs: u64 },

    /// The child was terminated by a signal and reported no exit code.
    #[error("'{program}' was terminated by a signal")]
    Terminated { program: String },
}

impl InvokeError {
    /// Exit code reported for the phase, whatever the variant.
    pub const EXIT_CODE: i32 = 1;

    /// Creates a `Spawn` error with a suggestion matching the failure kind.
    #[must_use]
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        let suggestion = match source.kind() {
            std::io::ErrorKind::NotFound => "Install the downloader or pass its path explicitly",
            std::io::ErrorKind::PermissionDenied => "Make the downloader executable",
            _ => "Check that the downloader runs from a shell",
        };
        Self::Spawn {
            program: program.into(),
            source,
            suggestion,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_not_found_suggests_install() {
        let err = InvokeError::spawn(
            "scdl",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        let msg = err.to_string();
        assert!(msg.contains("scdl"));
        assert!(msg.contains("Install the downloader"));
        assert_eq!(InvokeError::EXIT_CODE, 1);
    }

    #[test]
    fn test_timeout_message() {
        let err = InvokeError::Timeout {
            program: "yt-dlp".to_string(),
            secs: 7200,
        };
        assert!(err.to_string().contains("7200s"));
    }
}
