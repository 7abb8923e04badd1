//! Doctor command implementation.

use std::fmt::Write;
use std::path::PathBuf;

use clap::Parser;
use console::style;
use linthook_dispatch::display::Palette;
use linthook_dispatch::{Resolver, Tier};
use serde::Serialize;

use super::config::ConfigStatus;
use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Check that every resolvable tool is installed
#[derive(Debug, Parser)]
pub struct DoctorCommand {
    /// Only check the tools for these languages
    #[arg(long = "language", short = 'l', value_name = "LANG")]
    pub languages: Vec<String>,
}

impl DoctorCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let formatter = ctx.formatter();
        let validator = ctx.validator();

        let report = DoctorReport {
            formatters: ConfigStatus::new(&ctx.paths.formatters, formatter.config_state()),
            validators: ConfigStatus::new(&ctx.paths.validators, validator.config_state()),
            tools: self
                .check(formatter.resolver())
                .chain(self.check(validator.resolver()))
                .collect(),
        };
        print_output(ctx, &report)
    }

    fn check<'a>(&'a self, resolver: &'a Resolver) -> impl Iterator<Item = ToolCheck> + 'a {
        let subsystem = resolver.subsystem().as_str();
        resolver
            .known_languages()
            .into_iter()
            .filter(move |language| self.languages.is_empty() || self.languages.contains(language))
            .flat_map(move |language| {
                resolver.tools_for(&language).into_iter().map(move |tool| {
                    ToolCheck::probe(
                        subsystem,
                        &tool.language,
                        &tool.name,
                        &tool.tool.command,
                        tool.source,
                    )
                })
            })
    }
}

/// Whether one tool's executable can be found.
#[derive(Debug, Serialize)]
pub struct ToolCheck {
    pub subsystem: &'static str,
    pub language: String,
    pub name: String,
    pub command: String,
    pub tier: Tier,
    /// Where the executable was found on `PATH`.
    pub found: Option<PathBuf>,
}

impl ToolCheck {
    pub fn probe(
        subsystem: &'static str,
        language: &str,
        name: &str,
        command: &str,
        tier: Tier,
    ) -> Self {
        Self {
            subsystem,
            language: language.to_string(),
            name: name.to_string(),
            command: command.to_string(),
            tier,
            found: which::which(command).ok(),
        }
    }

    fn line(&self, palette: &Palette) -> String {
        let label = format!(
            "{}: {} ({}, {})",
            self.language, self.name, self.command, self.tier
        );
        match &self.found {
            Some(_) => palette.success(&label),
            None => palette.failure(&format!("{label} not found on PATH")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorReport {
    pub formatters: ConfigStatus,
    pub validators: ConfigStatus,
    pub tools: Vec<ToolCheck>,
}

impl DoctorReport {
    pub fn missing(&self) -> impl Iterator<Item = &ToolCheck> {
        self.tools.iter().filter(|t| t.found.is_none())
    }
}

impl FormattedOutput for DoctorReport {
    fn format_text(&self, palette: &Palette) -> String {
        let heading = |title: &str| {
            style(title)
                .bold()
                .force_styling(palette.color)
                .to_string()
        };
        let mut text = String::new();

        let _ = writeln!(text, "{}", heading("Config:"));
        let _ = writeln!(text, "  {}", self.formatters.headline("formatters", palette));
        let _ = writeln!(text, "  {}", self.validators.headline("validators", palette));

        for (subsystem, title) in [("format", "Formatters:"), ("validate", "Validators:")] {
            let _ = writeln!(text);
            let _ = writeln!(text, "{}", heading(title));
            for check in self.tools.iter().filter(|t| t.subsystem == subsystem) {
                let _ = writeln!(text, "  {}", check.line(palette));
            }
        }

        let missing: Vec<&ToolCheck> = self.missing().collect();
        let _ = writeln!(text);
        if missing.is_empty() {
            let _ = writeln!(text, "{}", palette.success("All tools available"));
        } else {
            let summary = format!("{} tool(s) missing", missing.len());
            let _ = writeln!(text, "{}", palette.warning(&summary));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linthook_common_config::ConfigState;
    use linthook_dispatch::Subsystem;

    fn status(name: &str) -> ConfigStatus {
        let path = PathBuf::from(name);
        ConfigStatus::new(&path, &ConfigState::Missing { path: path.clone() })
    }

    #[test]
    fn test_probe_finds_sh() {
        let check = ToolCheck::probe("validate", "shell", "sh_syntax", "sh", Tier::Config);
        assert!(check.found.is_some());
        assert_eq!(check.line(&Palette::plain()), "✓ shell: sh_syntax (sh, config)");
    }

    #[test]
    fn test_probe_missing_command() {
        let check =
            ToolCheck::probe("format", "go", "gofmt", "linthook-no-such-tool", Tier::Fallback);
        assert!(check.found.is_none());
        assert_eq!(
            check.line(&Palette::plain()),
            "✗ go: gofmt (linthook-no-such-tool, fallback) not found on PATH"
        );
    }

    #[test]
    fn test_language_filter() {
        let cmd = DoctorCommand {
            languages: vec!["go".to_string()],
        };
        let resolver = Resolver::new(Subsystem::Validate, ConfigState::default());
        let checks: Vec<ToolCheck> = cmd.check(&resolver).collect();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].name, "go_vet");
        assert_eq!(checks[0].tier, Tier::Fallback);
        assert_eq!(checks[0].subsystem, "validate");
    }

    #[test]
    fn test_summary_counts_missing() {
        let report = DoctorReport {
            formatters: status("f.jsonc"),
            validators: status("v.jsonc"),
            tools: vec![
                ToolCheck::probe(
                    "format",
                    "shell",
                    "shfmt",
                    "linthook-no-such-tool",
                    Tier::Fallback,
                ),
                ToolCheck::probe("validate", "shell", "sh_syntax", "sh", Tier::Config),
            ],
        };
        assert_eq!(report.missing().count(), 1);
        let text = report.format_text(&Palette::plain());
        assert!(text.contains("Formatters:\n  ✗ shell: shfmt"));
        assert!(text.contains("Validators:\n  ✓ shell: sh_syntax (sh, config)\n"));
        assert!(text.contains("⚠ 1 tool(s) missing"));
    }
}
