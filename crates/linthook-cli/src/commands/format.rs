//! Format command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use linthook_common_log::spans::Timer;
use linthook_dispatch::display::Palette;
use linthook_dispatch::{DispatchError, FormatResult, Formatter};
use serde::Serialize;
use tracing::info;

use super::Targets;
use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, render, FormattedOutput};

/// Format files in place
#[derive(Debug, Parser)]
pub struct FormatCommand {
    #[command(flatten)]
    pub targets: Targets,
}

impl FormatCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let files = self.targets.resolve()?;
        let formatter = ctx.formatter();

        let report = format_all(ctx, &formatter, &files).await;
        print_output(ctx, &report)?;
        report.outcome(formatter.resolver().behavior().fail_on_error)
    }
}

/// One file's formatting outcome.
#[derive(Debug, Serialize)]
pub struct FileFormat {
    pub file: PathBuf,
    pub extension: String,
    #[serde(flatten)]
    pub result: FormatResult,
}

impl FileFormat {
    fn format_text(&self, palette: &Palette) -> String {
        render(|out| {
            self.result.report_with(out, palette)?;
            let Some(err) = &self.result.error else {
                return Ok(());
            };

            let line = format!(
                "{}: {} failed: {err}",
                self.file.display(),
                self.result.formatter
            );
            writeln!(out, "{}", palette.failure(&line))?;
            if let DispatchError::ToolFailed { output, .. } = err {
                for line in output.lines().filter(|l| !l.trim().is_empty()) {
                    writeln!(out, "   {}", line.trim_end())?;
                }
            }
            Ok(())
        })
    }
}

/// Outcome of a format run over several files.
#[derive(Debug, Serialize)]
pub struct FormatReport {
    pub files: Vec<FileFormat>,
}

impl FormatReport {
    /// Files whose formatter was attempted and failed.
    pub fn failures(&self) -> usize {
        self.files.iter().filter(|f| f.result.failed()).count()
    }

    /// Failures only fail the command when the config says so.
    pub fn outcome(&self, fail_on_error: bool) -> Result<(), CliError> {
        match self.failures() {
            0 => Ok(()),
            _ if !fail_on_error => Ok(()),
            n => Err(CliError::format(format!("{n} file(s) failed to format"))),
        }
    }
}

impl FormattedOutput for FormatReport {
    fn format_text(&self, palette: &Palette) -> String {
        self.files.iter().map(|f| f.format_text(palette)).collect()
    }
}

/// Format each file in order, stopping early once cancelled.
pub async fn format_all(
    ctx: &CommandContext,
    formatter: &Formatter,
    files: &[(PathBuf, String)],
) -> FormatReport {
    let timer = Timer::start("format");
    let mut entries = Vec::with_capacity(files.len());

    for (file, ext) in files {
        if ctx.cancel.is_cancelled() {
            break;
        }
        let result = formatter.format_file(file, ext).await;
        entries.push(FileFormat {
            file: file.clone(),
            extension: ext.clone(),
            result,
        });
    }

    let report = FormatReport { files: entries };
    info!(
        files = report.files.len(),
        failed = report.failures(),
        duration = ?timer.finish(),
        "formatting finished"
    );
    report
}
