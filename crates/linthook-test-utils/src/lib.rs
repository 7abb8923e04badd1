//! Test utilities for linthook crates.
//!
//! Fake tools are tiny `sh` scripts that print canned output, exit with a
//! chosen status, and record how they were invoked.

use linthook_common_config::{DispatchConfig, LanguageEntry, ToolDefinition};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Creates a named temporary file with given content.
pub fn temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write temp file");
    (dir, path)
}

/// A scripted stand-in for an external tool.
#[derive(Debug, Clone)]
pub struct FakeTool {
    name: String,
    stdout: String,
    stderr: String,
    exit_code: i32,
    sleep_secs: u32,
}

impl FakeTool {
    /// A tool that succeeds silently.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
            sleep_secs: 0,
        }
    }

    pub fn stdout(mut self, text: &str) -> Self {
        self.stdout = text.to_string();
        self
    }

    pub fn stderr(mut self, text: &str) -> Self {
        self.stderr = text.to_string();
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Sleep before producing output.
    pub fn sleep(mut self, secs: u32) -> Self {
        self.sleep_secs = secs;
        self
    }

    /// Write the script into `dir` and make it executable.
    pub fn install(&self, dir: &Path) -> InstalledTool {
        let path = dir.join(&self.name);
        let args_file = dir.join(format!("{}.args", self.name));
        let pwd_file = dir.join(format!("{}.pwd", self.name));

        let mut script = String::from("#!/bin/sh\n");
        script.push_str(&format!("pwd > {}\n", quote(&pwd_file.to_string_lossy())));
        script.push_str(&format!(
            "printf '%s\\n' \"$@\" > {}\n",
            quote(&args_file.to_string_lossy())
        ));
        if self.sleep_secs > 0 {
            script.push_str(&format!("sleep {}\n", self.sleep_secs));
        }
        if !self.stdout.is_empty() {
            script.push_str(&format!("printf '%s' {}\n", quote(&self.stdout)));
        }
        if !self.stderr.is_empty() {
            script.push_str(&format!("printf '%s' {} >&2\n", quote(&self.stderr)));
        }
        script.push_str(&format!("exit {}\n", self.exit_code));

        fs::write(&path, script).expect("Failed to write fake tool");
        make_executable(&path);

        InstalledTool {
            path,
            args_file,
            pwd_file,
        }
    }
}

/// A fake tool on disk.
#[derive(Debug, Clone)]
pub struct InstalledTool {
    /// Absolute path of the script; use as the tool's command.
    pub path: PathBuf,
    args_file: PathBuf,
    pwd_file: PathBuf,
}

impl InstalledTool {
    /// The script path as a command string.
    pub fn command(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// An enabled tool definition that runs the script through `sh`.
    ///
    /// Going through `sh` avoids exec'ing a file that was just written,
    /// which can fail with `ETXTBSY` while other test threads fork.
    pub fn definition<I, S>(&self, args: I) -> ToolDefinition
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = std::iter::once(self.command()).chain(args.into_iter().map(Into::into));
        ToolDefinition::new("sh", args.collect::<Vec<_>>())
    }

    /// Whether the tool has been run.
    pub fn was_run(&self) -> bool {
        self.args_file.exists()
    }

    /// Arguments of the last run.
    pub fn last_args(&self) -> Option<Vec<String>> {
        let raw = fs::read_to_string(&self.args_file).ok()?;
        Some(raw.lines().map(str::to_string).collect())
    }

    /// Working directory of the last run.
    pub fn last_dir(&self) -> Option<PathBuf> {
        let raw = fs::read_to_string(&self.pwd_file).ok()?;
        Some(PathBuf::from(raw.trim_end()))
    }
}

/// Single-quote a string for `sh`.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path).expect("Failed to stat").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("Failed to chmod");
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

/// A config with one language, one extension and one primary tool.
pub fn single_tool_config(
    language: &str,
    ext: &str,
    tool_name: &str,
    tool: ToolDefinition,
) -> DispatchConfig {
    let mut config = DispatchConfig::default();
    config.extensions.insert(ext.to_string(), language.to_string());
    config.languages.insert(
        language.to_string(),
        LanguageEntry {
            primary: Some(tool_name.to_string()),
            description: None,
            tools: [(tool_name.to_string(), tool)].into_iter().collect(),
        },
    );
    config
}

/// Write a config as JSONC (with a leading comment) and return its path.
pub fn write_config(dir: &Path, file_name: &str, config: &DispatchConfig) -> PathBuf {
    let path = dir.join(file_name);
    let json = serde_json::to_string_pretty(config).expect("Failed to serialize config");
    fs::write(&path, format!("// written by linthook-test-utils\n{json}\n"))
        .expect("Failed to write config");
    path
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err and return the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use linthook_common_config::ConfigLoader;
    use proptest::prelude::*;
    use std::process::Command;

    #[test]
    fn test_temp_file_creation() {
        let (_dir, path) = temp_file("main.go", "package main\n");
        assert!(path.is_file());
        assert_eq!(path.file_name().unwrap(), "main.go");
    }

    #[test]
    fn test_fake_tool_records_invocation() {
        let dir = temp_dir();
        let tool = FakeTool::new("vet")
            .stdout("it's fine")
            .stderr("oops")
            .exit_code(3)
            .install(dir.path());
        assert!(!tool.was_run());

        let output = Command::new("sh")
            .arg(&tool.path)
            .args(["-w", "a b.go"])
            .current_dir(dir.path())
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(3));
        assert_eq!(String::from_utf8_lossy(&output.stdout), "it's fine");
        assert_eq!(String::from_utf8_lossy(&output.stderr), "oops");
        assert_eq!(tool.last_args().unwrap(), ["-w", "a b.go"]);
        assert_eq!(
            tool.last_dir().unwrap().canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_definition_runs_through_sh() {
        let dir = temp_dir();
        let tool = FakeTool::new("fmt").install(dir.path());
        let def = tool.definition(["-w", "{filepath}"]);
        assert_eq!(def.command, "sh");
        assert_eq!(def.args, [tool.command(), "-w".into(), "{filepath}".into()]);
        assert!(def.is_usable());
    }

    #[test]
    fn test_written_config_loads() {
        let dir = temp_dir();
        let config = single_tool_config(
            "go",
            ".go",
            "vet",
            ToolDefinition::new("go", ["vet", "{filepath}"]),
        );
        let path = write_config(dir.path(), "validators.jsonc", &config);
        let loaded = assert_ok!(ConfigLoader::new(&path).try_load());
        assert_eq!(loaded, config);
    }

    proptest! {
        #[test]
        fn test_quote_roundtrips_through_sh(content in "[ -~]{0,40}") {
            let out = Command::new("sh")
                .arg("-c")
                .arg(format!("printf '%s' {}", quote(&content)))
                .output()
                .unwrap();
            prop_assert_eq!(String::from_utf8_lossy(&out.stdout).into_owned(), content);
        }
    }
}
