//! Validate command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use linthook_common_log::spans::Timer;
use linthook_dispatch::display::Palette;
use linthook_dispatch::{ValidationResult, Validator};
use serde::Serialize;
use tracing::info;

use super::Targets;
use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, render, FormattedOutput};

/// Validate files and report findings
#[derive(Debug, Parser)]
pub struct ValidateCommand {
    #[command(flatten)]
    pub targets: Targets,
}

impl ValidateCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let files = self.targets.resolve()?;
        let validator = ctx.validator();

        let report = validate_all(ctx, &validator, &files).await;
        print_output(ctx, &report)?;
        report.outcome()
    }
}

/// Outcome of a validation run over several files.
#[derive(Debug, Serialize)]
pub struct ValidateReport {
    /// Every file passed.
    pub valid: bool,
    pub files: Vec<ValidationResult>,
}

impl ValidateReport {
    pub fn new(files: Vec<ValidationResult>) -> Self {
        Self {
            valid: files.iter().all(|f| f.valid),
            files,
        }
    }

    pub fn invalid(&self) -> usize {
        self.files.iter().filter(|f| !f.valid).count()
    }

    pub fn outcome(&self) -> Result<(), CliError> {
        match self.invalid() {
            0 => Ok(()),
            n => Err(CliError::validation(format!("{n} file(s) failed validation"))),
        }
    }
}

impl FormattedOutput for ValidateReport {
    fn format_text(&self, palette: &Palette) -> String {
        render(|out| {
            for result in self.files.iter().filter(|f| !f.valid) {
                writeln!(out, "{}", palette.failure(&result.file_path.display().to_string()))?;
                result.report_with(out, palette)?;
            }
            if self.valid && !self.files.is_empty() {
                let checked = self.files.iter().filter(|f| !f.validator.is_empty()).count();
                let summary = format!(
                    "{checked} of {} file(s) checked, no problems",
                    self.files.len()
                );
                writeln!(out, "{}", palette.success(&summary))?;
            }
            Ok(())
        })
    }
}

/// Validate each file in order, stopping early once cancelled.
pub async fn validate_all(
    ctx: &CommandContext,
    validator: &Validator,
    files: &[(PathBuf, String)],
) -> ValidateReport {
    let timer = Timer::start("validate");
    let mut results = Vec::with_capacity(files.len());

    for (file, ext) in files {
        if ctx.cancel.is_cancelled() {
            break;
        }
        results.push(validator.validate_file(file, ext).await);
    }

    let report = ValidateReport::new(results);
    info!(
        files = report.files.len(),
        invalid = report.invalid(),
        duration = ?timer.finish(),
        "validation finished"
    );
    report
}
