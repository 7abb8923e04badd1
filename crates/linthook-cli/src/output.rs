//! Output formatting utilities for CLI commands.

use serde::Serialize;
use std::io::{self, Write};

use linthook_dispatch::display::Palette;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::CliError;

/// Types that can be printed as text or JSON
pub trait FormattedOutput: Serialize {
    /// Human-readable rendering; every line ends with a newline.
    fn format_text(&self, palette: &Palette) -> String;

    fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Print formatted output to stdout
pub fn print_output<T: FormattedOutput>(ctx: &CommandContext, value: &T) -> Result<(), CliError> {
    write_output(ctx, value, io::stdout().lock())
}

/// Print formatted output to a writer
pub fn write_output<T, W>(ctx: &CommandContext, value: &T, mut writer: W) -> Result<(), CliError>
where
    T: FormattedOutput,
    W: Write,
{
    match ctx.format {
        OutputFormat::Text => write!(writer, "{}", value.format_text(&ctx.palette()))?,
        OutputFormat::Json => writeln!(writer, "{}", value.format_json()?)?,
    }
    writer.flush()?;
    Ok(())
}

/// Render through an `io::Write`-based reporter into a string.
pub fn render<F>(report: F) -> String
where
    F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
{
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = report(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        name: &'static str,
    }

    impl FormattedOutput for Sample {
        fn format_text(&self, palette: &Palette) -> String {
            format!("{}\n", palette.success(self.name))
        }
    }

    #[test]
    fn test_render_collects_writes() {
        let text = render(|out| {
            writeln!(out, "one")?;
            writeln!(out, "two")
        });
        assert_eq!(text, "one\ntwo\n");
    }

    #[test]
    fn test_default_json() {
        let json = Sample { name: "gofmt" }.format_json().unwrap();
        assert!(json.contains("\"name\": \"gofmt\""));
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(Sample { name: "ok" }.format_text(&Palette::plain()), "✓ ok\n");
    }
}
