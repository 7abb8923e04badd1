//! Resolve command implementation.

use std::fmt::Write;

use clap::Parser;
use linthook_dispatch::display::Palette;
use linthook_dispatch::{ResolvedTool, Resolver, Tier};
use serde::Serialize;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Show which language and tools an extension resolves to
#[derive(Debug, Parser)]
pub struct ResolveCommand {
    /// Extension to resolve, with or without the leading dot
    pub ext: String,
}

impl ResolveCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        if self.ext.trim_start_matches('.').is_empty() {
            return Err(CliError::user_with_hint(
                "no extension given",
                "pass an extension such as `.go` or `py`",
            ));
        }

        let report = ResolveReport {
            extension: self.ext.clone(),
            formatter: Resolution::of(ctx.formatter().resolver(), &self.ext),
            validator: Resolution::of(ctx.validator().resolver(), &self.ext),
        };
        print_output(ctx, &report)
    }
}

/// What one subsystem does with an extension.
#[derive(Debug, Serialize)]
pub struct Resolution {
    /// Empty when the extension is unknown.
    pub language: String,
    pub tool: Option<ToolSummary>,
}

impl Resolution {
    pub fn of(resolver: &Resolver, ext: &str) -> Self {
        let language = resolver.resolve_language(ext).unwrap_or_default();
        let tool = resolver.resolve_tool(&language).map(ToolSummary::from);
        Self { language, tool }
    }

    fn describe(&self) -> String {
        if self.language.is_empty() {
            return "unknown extension".to_string();
        }
        match &self.tool {
            Some(tool) => format!(
                "{} -> {} ({}, {})",
                self.language, tool.name, tool.command, tool.tier
            ),
            None => format!("{} -> no tool", self.language),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToolSummary {
    pub name: String,
    pub command: String,
    pub tier: Tier,
}

impl From<ResolvedTool> for ToolSummary {
    fn from(resolved: ResolvedTool) -> Self {
        Self {
            name: resolved.name,
            command: resolved.tool.command,
            tier: resolved.source,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResolveReport {
    pub extension: String,
    pub formatter: Resolution,
    pub validator: Resolution,
}

impl FormattedOutput for ResolveReport {
    fn format_text(&self, _palette: &Palette) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "extension  {}", self.extension);
        let _ = writeln!(text, "formatter  {}", self.formatter.describe());
        let _ = writeln!(text, "validator  {}", self.validator.describe());
        text
    }
}
