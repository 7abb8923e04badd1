//! Check command: format, then validate.

use clap::Parser;
use linthook_dispatch::display::Palette;
use serde::Serialize;

use super::format::{format_all, FormatReport};
use super::validate::{validate_all, ValidateReport};
use super::Targets;
use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Format, then validate (the post-write hook flow)
#[derive(Debug, Parser)]
pub struct CheckCommand {
    #[command(flatten)]
    pub targets: Targets,
}

impl CheckCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let files = self.targets.resolve()?;
        let formatter = ctx.formatter();
        let validator = ctx.validator();

        let report = CheckReport {
            format: format_all(ctx, &formatter, &files).await,
            validate: validate_all(ctx, &validator, &files).await,
        };
        print_output(ctx, &report)?;
        report.outcome(formatter.resolver().behavior().fail_on_error)
    }
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub format: FormatReport,
    pub validate: ValidateReport,
}

impl CheckReport {
    /// Validation failures take precedence over formatting failures.
    pub fn outcome(&self, fail_on_error: bool) -> Result<(), CliError> {
        self.validate.outcome()?;
        self.format.outcome(fail_on_error)
    }
}

impl FormattedOutput for CheckReport {
    fn format_text(&self, palette: &Palette) -> String {
        let mut text = self.format.format_text(palette);
        text.push_str(&self.validate.format_text(palette));
        text
    }
}
