//! Status line styling.

use console::style;
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use std::env;
use std::io;
use std::sync::atomic::{AtomicU8, Ordering};

/// Whether to emit ANSI colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Colour when stdout is a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    Always,
    Never,
}

static COLOR_CHOICE: AtomicU8 = AtomicU8::new(0);

/// Set the process-wide colour choice.
pub fn set_color_choice(choice: ColorChoice) {
    let raw = match choice {
        ColorChoice::Auto => 0,
        ColorChoice::Always => 1,
        ColorChoice::Never => 2,
    };
    COLOR_CHOICE.store(raw, Ordering::Relaxed);
}

/// The process-wide colour choice.
pub fn color_choice() -> ColorChoice {
    match COLOR_CHOICE.load(Ordering::Relaxed) {
        1 => ColorChoice::Always,
        2 => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Status icons.
pub struct Icons;

impl Icons {
    pub const CHECK: &'static str = "✓";
    pub const CROSS: &'static str = "✗";
    pub const WARNING: &'static str = "⚠";

    pub const CHECK_ASCII: &'static str = "[ok]";
    pub const CROSS_ASCII: &'static str = "[err]";
    pub const WARNING_ASCII: &'static str = "[warn]";
}

/// Resolved styling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub color: bool,
    pub unicode: bool,
}

impl Palette {
    /// Styling for the current process and terminal.
    pub fn current() -> Self {
        let color = match color_choice() {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal(),
        };
        Self {
            color,
            unicode: detect_unicode_support(),
        }
    }

    /// Unicode icons, no colour.
    pub fn plain() -> Self {
        Self {
            color: false,
            unicode: true,
        }
    }

    /// Green check line.
    pub fn success(&self, msg: &str) -> String {
        if msg.is_empty() {
            return String::new();
        }
        let icon = if self.unicode { Icons::CHECK } else { Icons::CHECK_ASCII };
        style(format!("{icon} {msg}"))
            .green()
            .force_styling(self.color)
            .to_string()
    }

    /// Yellow warning line.
    pub fn warning(&self, msg: &str) -> String {
        if msg.is_empty() {
            return String::new();
        }
        let icon = if self.unicode { Icons::WARNING } else { Icons::WARNING_ASCII };
        style(format!("{icon} {msg}"))
            .yellow()
            .force_styling(self.color)
            .to_string()
    }

    /// Red failure line.
    pub fn failure(&self, msg: &str) -> String {
        if msg.is_empty() {
            return String::new();
        }
        let icon = if self.unicode { Icons::CROSS } else { Icons::CROSS_ASCII };
        style(format!("{icon} {msg}"))
            .red()
            .force_styling(self.color)
            .to_string()
    }
}

/// [`Palette::success`] with the current palette.
pub fn success(msg: &str) -> String {
    Palette::current().success(msg)
}

/// [`Palette::warning`] with the current palette.
pub fn warning(msg: &str) -> String {
    Palette::current().warning(msg)
}

/// [`Palette::failure`] with the current palette.
pub fn failure(msg: &str) -> String {
    Palette::current().failure(msg)
}

fn detect_unicode_support() -> bool {
    env::var("TERM").map(|t| !t.contains("linux")).unwrap_or(true)
        && env::var("LANG")
            .map(|l| l.is_empty() || l.to_uppercase().contains("UTF"))
            .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_success_and_warning() {
        let palette = Palette::plain();
        assert_eq!(palette.success("Formatted with gofmt"), "✓ Formatted with gofmt");
        assert_eq!(palette.warning("Validation warnings"), "⚠ Validation warnings");
        assert_eq!(palette.failure("gofmt missing"), "✗ gofmt missing");
    }

    #[test]
    fn test_empty_message_renders_nothing() {
        let palette = Palette {
            color: true,
            unicode: true,
        };
        assert_eq!(palette.success(""), "");
        assert_eq!(palette.warning(""), "");
        assert_eq!(palette.failure(""), "");
    }

    #[test]
    fn test_ascii_icons() {
        let palette = Palette {
            color: false,
            unicode: false,
        };
        assert_eq!(palette.success("ok"), "[ok] ok");
        assert_eq!(palette.warning("hm"), "[warn] hm");
    }

    #[test]
    fn test_color_wraps_in_ansi() {
        let palette = Palette {
            color: true,
            unicode: true,
        };
        let line = palette.success("done");
        assert!(line.starts_with("\u{1b}["), "{line:?}");
        assert!(line.contains("✓ done"));
    }
}
