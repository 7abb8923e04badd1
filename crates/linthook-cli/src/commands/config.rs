//! Config command implementation.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use linthook_common_config::{Behavior, ConfigState};
use linthook_dispatch::display::Palette;
use serde::Serialize;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Inspect the dispatch config files
#[derive(Debug, Parser)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show whether each config loaded, and its behavior flags
    Show,
    /// Print where each config file is looked for
    Path,
}

impl ConfigCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        match self.action {
            ConfigAction::Path => print_output(
                ctx,
                &ConfigPathsReport {
                    formatters: ctx.paths.formatters.clone(),
                    validators: ctx.paths.validators.clone(),
                },
            ),
            ConfigAction::Show => {
                let report = ConfigReport {
                    formatters: ConfigStatus::new(&ctx.paths.formatters, &ctx.formatters_state()),
                    validators: ConfigStatus::new(&ctx.paths.validators, &ctx.validators_state()),
                };
                print_output(ctx, &report)?;
                report.outcome()
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigPathsReport {
    pub formatters: PathBuf,
    pub validators: PathBuf,
}

impl FormattedOutput for ConfigPathsReport {
    fn format_text(&self, _palette: &Palette) -> String {
        format!(
            "formatters  {}\nvalidators  {}\n",
            self.formatters.display(),
            self.validators.display()
        )
    }
}

/// Load state of one config file.
#[derive(Debug, Serialize)]
pub struct ConfigStatus {
    pub path: PathBuf,
    /// `loaded`, `missing` or `invalid`.
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub languages: usize,
    pub extensions: usize,
    /// Problems that do not stop the config from loading.
    pub issues: Vec<String>,
    /// Effective behavior flags; defaults when nothing loaded.
    pub behavior: Behavior,
}

impl ConfigStatus {
    pub fn new(path: &Path, state: &ConfigState) -> Self {
        let (label, reason) = match state {
            ConfigState::Loaded(_) => ("loaded", None),
            ConfigState::Missing { .. } => ("missing", None),
            ConfigState::Invalid { reason, .. } => ("invalid", Some(reason.clone())),
        };
        let config = state.config();
        Self {
            path: path.to_path_buf(),
            state: label,
            reason,
            languages: config.map_or(0, |c| c.languages.len()),
            extensions: config.map_or(0, |c| c.extensions.len()),
            issues: config.map(|c| c.issues()).unwrap_or_default(),
            behavior: config.map(|c| c.config.clone()).unwrap_or_default(),
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.state == "invalid"
    }

    /// One status line for `doctor` and `config show`.
    pub fn headline(&self, name: &str, palette: &Palette) -> String {
        let path = self.path.display();
        match (self.state, &self.reason) {
            ("loaded", _) => palette.success(&format!(
                "{name}: {path} ({} languages, {} extensions)",
                self.languages, self.extensions
            )),
            (_, Some(reason)) => palette.failure(&format!("{name}: {path} is invalid: {reason}")),
            _ => palette.warning(&format!("{name}: {path} not found, using built-in defaults")),
        }
    }

    fn format_text(&self, name: &str, palette: &Palette) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "{}", self.headline(name, palette));
        for issue in &self.issues {
            let _ = writeln!(text, "   {}", palette.warning(issue));
        }
        if let Ok(serde_json::Value::Object(flags)) = serde_json::to_value(&self.behavior) {
            for (key, value) in flags {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                let _ = writeln!(text, "   {key} = {value}");
            }
        }
        text
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigReport {
    pub formatters: ConfigStatus,
    pub validators: ConfigStatus,
}

impl ConfigReport {
    /// A file that exists but cannot be used is a config error.
    pub fn outcome(&self) -> Result<(), CliError> {
        let broken: Vec<String> = [&self.formatters, &self.validators]
            .into_iter()
            .filter(|s| s.is_invalid())
            .map(|s| s.path.display().to_string())
            .collect();
        if broken.is_empty() {
            return Ok(());
        }
        Err(CliError::config_with_hint(
            format!("invalid config: {}", broken.join(", ")),
            "fix the file or remove it to use the built-in defaults",
        ))
    }
}

impl FormattedOutput for ConfigReport {
    fn format_text(&self, palette: &Palette) -> String {
        let mut text = self.formatters.format_text("formatters", palette);
        text.push_str(&self.validators.format_text("validators", palette));
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linthook_common_config::DispatchConfig;

    fn missing() -> ConfigStatus {
        let path = PathBuf::from("/etc/linthook/formatters.jsonc");
        ConfigStatus::new(&path, &ConfigState::Missing { path: path.clone() })
    }

    #[test]
    fn test_missing_status() {
        let status = missing();
        assert_eq!(status.state, "missing");
        assert_eq!(status.behavior, Behavior::default());
        assert_eq!(
            status.headline("formatters", &Palette::plain()),
            "⚠ formatters: /etc/linthook/formatters.jsonc not found, using built-in defaults"
        );
    }

    #[test]
    fn test_loaded_status_lists_flags() {
        let mut config = DispatchConfig::default();
        config.config.timeout_seconds = 30;
        config.extensions.insert("go".to_string(), "go".to_string());
        let status = ConfigStatus::new(Path::new("v.jsonc"), &ConfigState::Loaded(config));

        assert_eq!(status.state, "loaded");
        assert_eq!(status.extensions, 1);
        assert_eq!(status.issues.len(), 2);

        let text = status.format_text("validators", &Palette::plain());
        assert!(text.starts_with("✓ validators: v.jsonc (0 languages, 1 extensions)\n"));
        assert!(text.contains("   timeout_seconds = 30\n"));
        assert!(text.contains("   fallback_behavior = skip\n"));
    }

    #[test]
    fn test_invalid_is_config_error() {
        let path = PathBuf::from("bad.jsonc");
        let invalid = ConfigStatus::new(
            &path,
            &ConfigState::Invalid {
                path: path.clone(),
                reason: "invalid JSONC at line 1, column 2: oops".to_string(),
            },
        );
        let report = ConfigReport {
            formatters: missing(),
            validators: invalid,
        };
        let err = report.outcome().unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
        assert_eq!(err.to_string(), "invalid config: bad.jsonc");
    }
}
