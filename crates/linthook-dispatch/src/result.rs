//! Per-call outcomes and their human-readable reports.

use crate::display::Palette;
use crate::error::DispatchError;
use serde::{Serialize, Serializer};
use std::io::{self, Write};
use std::path::PathBuf;

/// Outcome of formatting one file.
#[derive(Debug, Default, Serialize)]
pub struct FormatResult {
    /// The tool ran and exited 0.
    pub formatted: bool,
    /// Executable that was run; empty when none was.
    pub formatter: String,
    /// Why formatting did not happen, when a tool was attempted.
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<DispatchError>,
}

impl FormatResult {
    /// No formatter applies; not an error.
    pub fn skipped() -> Self {
        Self::default()
    }

    /// A tool was attempted but did not succeed.
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }

    /// Print to stdout.
    pub fn report(&self) {
        let _ = self.report_to(&mut io::stdout().lock());
    }

    /// Write the report with the current palette.
    pub fn report_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.report_with(out, &Palette::current())
    }

    /// Write the report with an explicit palette.
    pub fn report_with<W: Write>(&self, out: &mut W, palette: &Palette) -> io::Result<()> {
        if self.formatted {
            writeln!(out, "{}", palette.success(&format!("Formatted with {}", self.formatter)))?;
        }
        Ok(())
    }
}

/// Outcome of validating one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// No blocking problem was found.
    pub valid: bool,
    /// Diagnostic lines, possibly present even when valid.
    pub warnings: Vec<String>,
    /// Tool name(s) that ran; empty when none did.
    pub validator: String,
    /// Resolved language; empty when the extension is unknown.
    pub language: String,
    /// File that was validated.
    pub file_path: PathBuf,
}

impl ValidationResult {
    /// Nothing to check; the file is valid.
    pub fn unchecked(file_path: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            valid: true,
            warnings: Vec::new(),
            validator: String::new(),
            language: language.into(),
            file_path: file_path.into(),
        }
    }

    /// Print to stdout.
    pub fn report(&self) {
        let _ = self.report_to(&mut io::stdout().lock());
    }

    /// Write the report with the current palette.
    pub fn report_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.report_with(out, &Palette::current())
    }

    /// Write the report with an explicit palette.
    ///
    /// Valid results print nothing.
    pub fn report_with<W: Write>(&self, out: &mut W, palette: &Palette) -> io::Result<()> {
        if self.valid {
            return Ok(());
        }

        let header = if self.language.is_empty() || self.validator.is_empty() {
            "Validation warnings".to_string()
        } else {
            format!("Validation warnings ({} / {})", self.language, self.validator)
        };

        writeln!(out, "{}", palette.warning(&header))?;
        for warning in &self.warnings {
            writeln!(out, "   {}", warning.trim())?;
        }
        Ok(())
    }
}

fn serialize_error<S: Serializer>(error: &Option<DispatchError>, s: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(err) => s.serialize_some(&err.to_string()),
        None => s.serialize_none(),
    }
}
