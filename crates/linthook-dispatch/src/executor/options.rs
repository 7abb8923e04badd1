//! Options for running a tool.

use super::cancel::CancellationWatcher;
use std::time::Duration;

/// Maximum bytes kept from each of stdout and stderr.
pub const MAX_OUTPUT_SIZE: usize = 10 * 1024 * 1024;

/// How a tool run is bounded.
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Kill the tool after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Kill the tool when cancelled.
    pub cancel: Option<CancellationWatcher>,
    /// Per-stream output cap in bytes.
    pub max_output_size: usize,
    /// `timeout` was chosen by the caller and must not be filled in later.
    explicit_timeout: bool,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            cancel: None,
            max_output_size: MAX_OUTPUT_SIZE,
            explicit_timeout: false,
        }
    }
}

impl ExecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self.explicit_timeout = true;
        self
    }

    /// Wait indefinitely, even if a default timeout is offered later.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self.explicit_timeout = true;
        self
    }

    /// Set timeout unless the caller already chose one (or chose none).
    pub fn or_timeout(mut self, timeout: Option<Duration>) -> Self {
        if !self.explicit_timeout {
            self.timeout = timeout;
        }
        self
    }

    /// Watch for cancellation.
    pub fn cancel(mut self, watcher: CancellationWatcher) -> Self {
        self.cancel = Some(watcher);
        self
    }

    /// Set the per-stream output cap.
    pub fn max_output_size(mut self, bytes: usize) -> Self {
        self.max_output_size = bytes;
        self
    }
}
