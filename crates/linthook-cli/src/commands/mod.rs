//! Command implementations.

mod check;
mod config;
mod doctor;
mod format;
mod resolve;
mod validate;

pub use check::CheckCommand;
pub use config::ConfigCommand;
pub use doctor::DoctorCommand;
pub use format::FormatCommand;
pub use resolve::ResolveCommand;
pub use validate::ValidateCommand;

use std::path::{Path, PathBuf};

use clap::{Args, ValueHint};
use linthook_common_fs::dotted_extension;

use crate::error::CliError;

/// Files a command acts on.
#[derive(Debug, Args)]
pub struct Targets {
    /// Files to process
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// Treat every file as having this extension (e.g. `.go`)
    #[arg(long, value_name = "EXT")]
    pub ext: Option<String>,
}

impl Targets {
    /// Extension used to dispatch `path`; empty when it has none.
    pub fn extension_for(&self, path: &Path) -> String {
        self.ext
            .clone()
            .or_else(|| dotted_extension(path))
            .unwrap_or_default()
    }

    /// Every file paired with its extension. Fails on the first file that
    /// cannot be read.
    pub fn resolve(&self) -> Result<Vec<(PathBuf, String)>, CliError> {
        self.files
            .iter()
            .map(|path| {
                std::fs::metadata(path).map_err(|e| {
                    CliError::io_with_path(format!("cannot read {}: {e}", path.display()), e, path)
                })?;
                Ok((path.clone(), self.extension_for(path)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(files: &[&str], ext: Option<&str>) -> Targets {
        Targets {
            files: files.iter().map(PathBuf::from).collect(),
            ext: ext.map(str::to_string),
        }
    }

    #[test]
    fn test_extension_from_path() {
        let t = targets(&["src/main.rs"], None);
        assert_eq!(t.extension_for(Path::new("src/main.rs")), ".rs");
        assert_eq!(t.extension_for(Path::new("Makefile")), "");
    }

    #[test]
    fn test_extension_override() {
        let t = targets(&["notes.txt"], Some(".md"));
        assert_eq!(t.extension_for(Path::new("notes.txt")), ".md");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.go");
        let t = Targets {
            files: vec![missing],
            ext: None,
        };
        let err = t.resolve().unwrap_err();
        assert!(matches!(err, CliError::Io { .. }), "{err:?}");
    }

    #[test]
    fn test_resolve_pairs_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("main.go");
        std::fs::write(&file, "package main\n").unwrap();
        let t = Targets {
            files: vec![file.clone()],
            ext: None,
        };
        assert_eq!(t.resolve().unwrap(), vec![(file, ".go".to_string())]);
    }
}
