//! Format files with the tool resolved for their extension.

use crate::command::build_command;
use crate::error::DispatchError;
use crate::executor::{ExecOptions, Executor};
use crate::resolver::Resolver;
use crate::result::FormatResult;
use crate::Subsystem;
use linthook_common_config::{ConfigLoader, ConfigPaths, ConfigState};
use linthook_common_log::spans::tool_span;
use std::path::Path;
use tracing::{debug, Instrument};

/// Formatter façade.
///
/// Holds only read-only state, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Formatter {
    resolver: Resolver,
    executor: Executor,
}

impl Formatter {
    /// Build from a config state; the config's timeout applies.
    pub fn new(state: ConfigState) -> Self {
        Self::with_options(state, ExecOptions::default())
    }

    /// Build with explicit execution options. An explicit timeout, or an
    /// explicit [`ExecOptions::no_timeout`], overrides the config's.
    pub fn with_options(state: ConfigState, options: ExecOptions) -> Self {
        let resolver = Resolver::new(Subsystem::Format, state);
        let options = options.or_timeout(resolver.behavior().timeout());
        Self {
            resolver,
            executor: Executor::new(options),
        }
    }

    /// Load the formatter config from a file.
    pub fn load(path: impl AsRef<Path>) -> Self {
        Self::new(ConfigLoader::new(path).load())
    }

    /// Load the formatter config from the location the environment names.
    pub fn from_env() -> Self {
        Self::load(ConfigPaths::from_env().formatters)
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn config_state(&self) -> &ConfigState {
        self.resolver.config_state()
    }

    /// Format a file in place.
    ///
    /// Never fails: an unknown extension or missing tool yields an
    /// unformatted result with no error, and tool failures are carried in
    /// [`FormatResult::error`].
    pub async fn format_file(&self, path: impl AsRef<Path>, ext: &str) -> FormatResult {
        let path = path.as_ref();

        let Some(language) = self.resolver.resolve_language(ext) else {
            debug!(ext, "no formatter language for extension");
            return FormatResult::skipped();
        };
        let Some(resolved) = self.resolver.resolve_tool(&language) else {
            return FormatResult::skipped();
        };

        let command = build_command(&resolved, path);
        let formatter = resolved.tool.command.clone();
        let span = tool_span(Subsystem::Format.as_str(), &resolved.name, path);

        match self.executor.run(&command).instrument(span).await {
            Ok(outcome) if outcome.success() => FormatResult {
                formatted: true,
                formatter,
                error: None,
            },
            Ok(outcome) => FormatResult {
                formatted: false,
                formatter,
                error: Some(DispatchError::ToolFailed {
                    exit_code: outcome.exit_code,
                    output: outcome.combined(),
                }),
            },
            Err(err) => FormatResult {
                formatted: false,
                formatter,
                error: Some(err),
            },
        }
    }

    /// Language for an extension; empty when unknown.
    pub fn language_for_extension(&self, ext: &str) -> String {
        self.resolver.resolve_language(ext).unwrap_or_default()
    }

    /// Executable of the tool that would format `language`; empty when none.
    pub fn primary_formatter(&self, language: &str) -> String {
        self.resolver
            .resolve_tool(language)
            .map(|t| t.tool.command)
            .unwrap_or_default()
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(ConfigState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_primary_formatter() {
        let formatter = Formatter::default();
        assert_eq!(formatter.language_for_extension(".go"), "go");
        assert_eq!(formatter.primary_formatter("go"), "gofmt");
        assert_eq!(formatter.primary_formatter("javascript"), "npx");
        assert_eq!(formatter.primary_formatter("cobol"), "");
        assert_eq!(formatter.language_for_extension(".xyz123"), "");
    }

    #[tokio::test]
    async fn test_unknown_extension_is_skipped() {
        let result = Formatter::default().format_file("notes.xyz123", ".xyz123").await;
        assert!(!result.formatted);
        assert!(result.error.is_none());
        assert!(result.formatter.is_empty());
    }
}
