//! Validate files with the tool(s) resolved for their extension.

use crate::command::build_command;
use crate::error::DispatchError;
use crate::executor::{ExecOptions, Executor};
use crate::output::{filter_for_file, parse_output};
use crate::resolver::{ResolvedTool, Resolver};
use crate::result::ValidationResult;
use crate::Subsystem;
use linthook_common_config::{Behavior, ConfigLoader, ConfigPaths, ConfigState, Severity, Strictness};
use linthook_common_log::spans::tool_span;
use std::path::Path;
use tracing::{debug, Instrument};

/// Validator façade.
#[derive(Debug, Clone)]
pub struct Validator {
    resolver: Resolver,
    executor: Executor,
}

/// What one validator run contributed.
#[derive(Debug, Default)]
struct ToolRun {
    failed: bool,
    warnings: Vec<String>,
}

impl Validator {
    /// Build from a config state; the config's timeout applies.
    pub fn new(state: ConfigState) -> Self {
        Self::with_options(state, ExecOptions::default())
    }

    /// Build with explicit execution options. An explicit timeout, or an
    /// explicit [`ExecOptions::no_timeout`], overrides the config's.
    pub fn with_options(state: ConfigState, options: ExecOptions) -> Self {
        let resolver = Resolver::new(Subsystem::Validate, state);
        let options = options.or_timeout(resolver.behavior().timeout());
        Self {
            resolver,
            executor: Executor::new(options),
        }
    }

    /// Load the validator config from a file.
    pub fn load(path: impl AsRef<Path>) -> Self {
        Self::new(ConfigLoader::new(path).load())
    }

    /// Load the validator config from the location the environment names.
    pub fn from_env() -> Self {
        Self::load(ConfigPaths::from_env().validators)
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn config_state(&self) -> &ConfigState {
        self.resolver.config_state()
    }

    /// Validate a file.
    ///
    /// Never fails: problems with the tools themselves become warnings on
    /// an invalid result.
    pub async fn validate_file(&self, path: impl AsRef<Path>, ext: &str) -> ValidationResult {
        let path = path.as_ref();

        let Some(language) = self.resolver.resolve_language(ext) else {
            debug!(ext, "no validator language for extension");
            return ValidationResult::unchecked(path, "");
        };

        let behavior = self.resolver.behavior();
        let tools = if behavior.run_all_validators {
            self.resolver.tools_for(&language)
        } else {
            self.resolver.resolve_tool(&language).into_iter().collect()
        };

        if tools.is_empty() {
            let mut result = ValidationResult::unchecked(path, &language);
            if behavior.missing_validator_fails() {
                result.valid = false;
                result.warnings.push(
                    DispatchError::NoTool {
                        language: language.clone(),
                    }
                    .to_string(),
                );
            }
            return result;
        }

        let labelled = tools.len() > 1;
        let mut result = ValidationResult {
            validator: tools
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            ..ValidationResult::unchecked(path, &language)
        };

        for tool in &tools {
            let run = self.run_tool(tool, path, &behavior).await;
            if run.failed && counts_as_failure(tool, &behavior) {
                result.valid = false;
            }
            result.warnings.extend(run.warnings.into_iter().map(|w| {
                if labelled {
                    format!("[{}] {w}", tool.name)
                } else {
                    w
                }
            }));
        }

        result
    }

    async fn run_tool(&self, resolved: &ResolvedTool, path: &Path, behavior: &Behavior) -> ToolRun {
        let command = build_command(resolved, path);
        let span = tool_span(Subsystem::Validate.as_str(), &resolved.name, path);

        let outcome = match self.executor.run(&command).instrument(span).await {
            Ok(outcome) => outcome,
            Err(err) => {
                return ToolRun {
                    failed: true,
                    warnings: vec![err.to_string()],
                }
            }
        };

        if outcome.success() {
            return ToolRun::default();
        }

        let output = outcome.combined();
        if output.trim().is_empty() {
            let err = DispatchError::ToolFailed {
                exit_code: outcome.exit_code,
                output,
            };
            return ToolRun {
                failed: true,
                warnings: vec![err.to_string()],
            };
        }

        let mut warnings = parse_output(&output, &resolved.language);
        if behavior.filter_by_file {
            warnings = filter_for_file(warnings, path);
            if warnings.is_empty() {
                debug!(tool = %resolved.name, "every diagnostic concerned other files");
                return ToolRun::default();
            }
        }

        ToolRun {
            failed: true,
            warnings,
        }
    }

    /// Language for an extension; empty when unknown.
    pub fn language_for_extension(&self, ext: &str) -> String {
        self.resolver.resolve_language(ext).unwrap_or_default()
    }

    /// Name of the tool that would validate `language`; empty when none.
    pub fn primary_validator(&self, language: &str) -> String {
        self.resolver
            .resolve_tool(language)
            .map(|t| t.name)
            .unwrap_or_default()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ConfigState::default())
    }
}

fn counts_as_failure(tool: &ResolvedTool, behavior: &Behavior) -> bool {
    !(behavior.strictness == Strictness::ErrorOnly && tool.tool.severity == Severity::Warning)
}
