//! Common test utilities for CLI testing.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use linthook_common_config::{DispatchConfig, FORMATTERS_FILE, VALIDATORS_FILE};
use linthook_test_utils::{temp_dir, write_config};
use tempfile::TempDir;

/// Test context with a temporary working directory holding both configs
pub struct TestContext {
    pub temp_dir: TempDir,
    pub formatters_path: PathBuf,
    pub validators_path: PathBuf,
}

impl TestContext {
    /// No config files; everything resolves through the built-in tables.
    pub fn new() -> Self {
        let temp_dir = temp_dir();
        let formatters_path = temp_dir.path().join(FORMATTERS_FILE);
        let validators_path = temp_dir.path().join(VALIDATORS_FILE);

        Self {
            temp_dir,
            formatters_path,
            validators_path,
        }
    }

    pub fn with_formatters(self, config: &DispatchConfig) -> Self {
        write_config(self.path(), FORMATTERS_FILE, config);
        self
    }

    pub fn with_validators(self, config: &DispatchConfig) -> Self {
        write_config(self.path(), VALIDATORS_FILE, config);
        self
    }

    /// Write a file into the working directory.
    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Get path to temp directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a command configured for this context
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("linthook").expect("Binary not found");
        cmd.current_dir(self.path())
            .env("LINTHOOK_FORMATTERS_CONFIG", &self.formatters_path)
            .env("LINTHOOK_VALIDATORS_CONFIG", &self.validators_path)
            .env_remove("LINTHOOK_CONFIG_DIR")
            .env_remove("LINTHOOK_LOG_LEVEL")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .env("LANG", "C.UTF-8")
            .env("TERM", "xterm");
        cmd
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON output helpers
pub mod json {
    use serde_json::Value;

    pub fn parse_output(output: &[u8]) -> Value {
        serde_json::from_slice(output).expect("Failed to parse JSON output")
    }
}
