//! Configuration types for linthook.
//!
//! This crate provides the typed shape of the `formatters.jsonc` and
//! `validators.jsonc` dispatch files, a comment-tolerant parser for them,
//! and the environment rules that locate them.

pub mod env;
pub mod jsonc;
pub mod loader;
pub mod types;

pub use env::{ConfigPaths, FORMATTERS_FILE, VALIDATORS_FILE};
pub use loader::*;
pub use types::*;
