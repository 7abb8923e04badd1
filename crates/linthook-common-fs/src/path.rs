//! Path helpers.

use std::env;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Files whose presence marks a project root, in lookup order.
pub const PROJECT_MARKERS: &[&str] = &["go.mod", "Cargo.toml", "package.json", "pyproject.toml"];

/// Find the project root for a file.
///
/// Walks upward from the file's directory looking for [`PROJECT_MARKERS`].
/// The search never ascends into `$HOME` or `/`. When nothing is found the
/// file's own directory is returned.
pub fn find_project_root(file: impl AsRef<Path>) -> PathBuf {
    let home = env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from);
    find_project_root_with(file, PROJECT_MARKERS, home.as_deref())
}

/// [`find_project_root`] with explicit markers and stop directory.
pub fn find_project_root_with(
    file: impl AsRef<Path>,
    markers: &[&str],
    stop_at: Option<&Path>,
) -> PathBuf {
    let start = parent_dir(file.as_ref());
    let mut current = start.clone();

    loop {
        if let Some(marker) = markers.iter().find(|m| current.join(m).exists()) {
            trace!(root = %current.display(), marker, "found project root");
            return current;
        }

        let parent = match current.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && parent != current => parent,
            _ => break,
        };
        if parent == Path::new("/") || Some(parent) == stop_at {
            break;
        }
        current = parent.to_path_buf();
    }

    start
}

/// Extension of a path with its leading dot, e.g. `.rs`.
pub fn dotted_extension(path: impl AsRef<Path>) -> Option<String> {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{e}"))
}

fn parent_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
