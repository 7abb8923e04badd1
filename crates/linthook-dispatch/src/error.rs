//! Error types for tool dispatch.

use std::time::Duration;
use thiserror::Error;

/// Why running a tool did not succeed.
///
/// These never escape the public façade as `Err`; they are stored inside
/// [`FormatResult`](crate::FormatResult) or rendered into validation
/// warnings.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No tool is available for the language.
    #[error("no tool available for language `{language}`")]
    NoTool {
        /// Language that has no tool.
        language: String,
    },

    /// The executable could not be started.
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        /// Executable that failed to start.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Reading output or waiting on the child failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The tool ran longer than allowed and was killed.
    #[error("timed out after {duration:?}")]
    Timeout {
        /// Limit that was exceeded.
        duration: Duration,
    },

    /// The run was cancelled and the tool was killed.
    #[error("cancelled")]
    Cancelled,

    /// The tool ran and exited unsuccessfully.
    #[error("exit status {}", exit_label(.exit_code))]
    ToolFailed {
        /// Exit code, absent when killed by a signal.
        exit_code: Option<i32>,
        /// Combined stdout and stderr.
        output: String,
    },
}

impl DispatchError {
    /// Whether the tool itself was never run to completion.
    pub fn is_execution_failure(&self) -> bool {
        !matches!(self, Self::ToolFailed { .. })
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    }
}

/// Result alias for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failed_display() {
        let err = DispatchError::ToolFailed {
            exit_code: Some(2),
            output: "boom".into(),
        };
        assert_eq!(err.to_string(), "exit status 2");
        assert!(!err.is_execution_failure());
    }

    #[test]
    fn test_signal_exit_display() {
        let err = DispatchError::ToolFailed {
            exit_code: None,
            output: String::new(),
        };
        assert!(err.to_string().contains("signal"));
    }

    #[test]
    fn test_spawn_display_names_program() {
        let err = DispatchError::Spawn {
            program: "gofmt".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert_eq!(
            err.to_string(),
            "failed to start `gofmt`: No such file or directory"
        );
        assert!(err.is_execution_failure());
    }

    #[test]
    fn test_timeout_display() {
        let err = DispatchError::Timeout {
            duration: Duration::from_secs(3),
        };
        assert_eq!(err.to_string(), "timed out after 3s");
    }
}
