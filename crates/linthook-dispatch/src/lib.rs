//! Extension-driven formatter and validator dispatch.
//!
//! Given a file path and its extension, pick the right external tool, run
//! it, and turn its exit status and output into a result that can be
//! reported. Tools come from the user's JSONC config when it names a
//! usable one, and from compiled-in tables otherwise.
//!
//! Nothing here fails the caller: every problem ends up inside the
//! returned [`FormatResult`] or [`ValidationResult`].
//!
//! ```no_run
//! use linthook_dispatch::Validator;
//!
//! # async fn example() {
//! let validator = Validator::from_env();
//! let result = validator.validate_file("src/main.go", ".go").await;
//! result.report();
//! # }
//! ```

pub mod command;
pub mod display;
pub mod error;
pub mod executor;
pub mod fallback;
pub mod formatter;
pub mod output;
pub mod resolver;
pub mod result;
pub mod validator;

pub use command::{build_command, ToolCommand};
pub use error::{DispatchError, DispatchResult};
pub use executor::{CancellationToken, CancellationWatcher, ExecOptions, Executor, RawOutcome};
pub use formatter::Formatter;
pub use output::parse_output;
pub use resolver::{ConfigMiss, ResolvedTool, Resolver, Tier, ToolSource};
pub use result::{FormatResult, ValidationResult};
pub use validator::Validator;

use fallback::FallbackTable;
use once_cell::sync::Lazy;
use std::path::Path;

/// The two dispatch subsystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    Format,
    Validate,
}

impl Subsystem {
    /// Compiled-in table for this subsystem.
    pub fn fallback_table(self) -> &'static FallbackTable {
        match self {
            Self::Format => &fallback::FORMATTERS,
            Self::Validate => &fallback::VALIDATORS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::Validate => "validate",
        }
    }
}

static DEFAULT_FORMATTER: Lazy<Formatter> = Lazy::new(Formatter::from_env);
static DEFAULT_VALIDATOR: Lazy<Validator> = Lazy::new(Validator::from_env);

/// Format with the process-wide formatter, loaded from the environment on
/// first use.
pub async fn format_file(path: impl AsRef<Path>, ext: &str) -> FormatResult {
    DEFAULT_FORMATTER.format_file(path, ext).await
}

/// Validate with the process-wide validator, loaded from the environment
/// on first use.
pub async fn validate_file(path: impl AsRef<Path>, ext: &str) -> ValidationResult {
    DEFAULT_VALIDATOR.validate_file(path, ext).await
}

/// Formatter language for an extension; empty when unknown.
pub fn get_language_for_extension(ext: &str) -> String {
    DEFAULT_FORMATTER.language_for_extension(ext)
}

/// Validator language for an extension; empty when unknown.
pub fn get_validator_language(ext: &str) -> String {
    DEFAULT_VALIDATOR.language_for_extension(ext)
}

/// Executable of the formatter for a language; empty when none.
pub fn get_primary_formatter(language: &str) -> String {
    DEFAULT_FORMATTER.primary_formatter(language)
}

/// Name of the validator for a language; empty when none.
pub fn get_primary_validator(language: &str) -> String {
    DEFAULT_VALIDATOR.primary_validator(language)
}

/// Synchronous wrappers for callers without a tokio runtime.
///
/// Each call drives a private current-thread runtime, so these must not be
/// called from inside an async context.
pub mod blocking {
    use super::*;

    fn block_on<F: std::future::Future>(future: F) -> std::io::Result<F::Output> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(future))
    }

    /// Blocking [`crate::format_file`].
    pub fn format_file(path: impl AsRef<Path>, ext: &str) -> FormatResult {
        block_on(super::format_file(path, ext)).unwrap_or_else(|err| FormatResult {
            formatted: false,
            formatter: String::new(),
            error: Some(DispatchError::Io(err)),
        })
    }

    /// Blocking [`crate::validate_file`].
    pub fn validate_file(path: impl AsRef<Path>, ext: &str) -> ValidationResult {
        let path = path.as_ref();
        block_on(super::validate_file(path, ext)).unwrap_or_else(|err| ValidationResult {
            valid: false,
            warnings: vec![DispatchError::Io(err).to_string()],
            ..ValidationResult::unchecked(path, "")
        })
    }
}
