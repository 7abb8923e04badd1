//! Filesystem utilities for linthook.

pub mod path;

pub use path::{dotted_extension, find_project_root, find_project_root_with, PROJECT_MARKERS};
