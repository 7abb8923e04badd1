//! Turning a resolved tool into a runnable command.

use crate::resolver::ResolvedTool;
use linthook_common_config::{WorkingDir, FILEPATH_TOKEN};
use linthook_common_fs::find_project_root;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// A fully substituted invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCommand {
    /// Executable, looked up on `PATH`.
    pub program: String,
    /// Arguments with the file path substituted.
    pub args: Vec<String>,
    /// Directory to run in; `None` inherits the caller's.
    pub working_dir: Option<PathBuf>,
}

impl ToolCommand {
    /// Build a tokio command with stdin closed and output captured.
    pub fn to_tokio(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Substitute the file path into a tool's argument template.
pub fn build_command(resolved: &ResolvedTool, file: &Path) -> ToolCommand {
    let tool = &resolved.tool;
    let path = file.to_string_lossy();

    let working_dir = match &tool.working_dir {
        WorkingDir::Inherit => None,
        WorkingDir::ProjectRoot => Some(find_project_root(file)),
        WorkingDir::Explicit(dir) => Some(dir.clone()),
    };

    ToolCommand {
        program: tool.command.clone(),
        args: substitute(&tool.args, &path),
        working_dir,
    }
}

/// Replace every placeholder occurrence in every argument.
pub fn substitute(args: &[String], file: &str) -> Vec<String> {
    args.iter()
        .map(|arg| arg.replace(FILEPATH_TOKEN, file))
        .collect()
}
