//! Logging infrastructure for linthook.
//!
//! Everything is written to stderr (and optionally a file). Stdout belongs
//! to tool reports and must stay clean for hook callers.

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

pub mod spans;

/// Convenience macros re-exported from tracing.
pub use tracing::{debug, error, info, trace, warn};

/// Environment variables read by [`LogConfig::from_env`].
pub mod vars {
    pub const LINTHOOK_LOG_LEVEL: &str = "LINTHOOK_LOG_LEVEL";
    pub const LINTHOOK_LOG_FORMAT: &str = "LINTHOOK_LOG_FORMAT";
    pub const LINTHOOK_LOG_FILE: &str = "LINTHOOK_LOG_FILE";
    pub const LINTHOOK_LOG_SOURCE: &str = "LINTHOOK_LOG_SOURCE";
    pub const RUST_LOG: &str = "RUST_LOG";
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Minimum log level.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Extra log file, appended to.
    pub file_path: Option<PathBuf>,
    /// Include file and line of the call site.
    pub source_location: bool,
    /// Raw `EnvFilter` directives; override `level` when set.
    pub directives: Option<String>,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    /// Parse from string, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Map `-v` / `-q` counts onto a level.
    ///
    /// Quiet wins. Each `-v` lowers the threshold by one step from `warn`.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return Self::Error;
        }
        match verbose {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human-readable output.
    Pretty,
    /// Single-line output.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "compact" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            file_path: None,
            source_location: false,
            directives: None,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Create config from an arbitrary variable lookup.
    ///
    /// `LINTHOOK_LOG_LEVEL` takes precedence over `RUST_LOG`. A `RUST_LOG`
    /// that is not a bare level is kept as filter directives.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(level) = get(vars::LINTHOOK_LOG_LEVEL) {
            if let Some(level) = LogLevel::parse(&level) {
                config.level = level;
            }
        } else if let Some(rust_log) = get(vars::RUST_LOG) {
            match LogLevel::parse(&rust_log) {
                Some(level) => config.level = level,
                None => config.directives = Some(rust_log),
            }
        }

        if let Some(format) = get(vars::LINTHOOK_LOG_FORMAT).and_then(|f| LogFormat::parse(&f)) {
            config.format = format;
        }

        if let Some(path) = get(vars::LINTHOOK_LOG_FILE) {
            config.file_path = Some(PathBuf::from(path));
        }

        if let Some(source) = get(vars::LINTHOOK_LOG_SOURCE) {
            config.source_location = matches!(source.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        config
    }

    /// Replace the level, dropping any directives.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self.directives = None;
        self
    }

    fn filter(&self) -> EnvFilter {
        self.directives
            .as_deref()
            .and_then(|d| EnvFilter::try_new(d).ok())
            .unwrap_or_else(|| EnvFilter::new(self.level.as_str()))
    }
}

/// Install the global subscriber.
pub fn init(config: LogConfig) -> Result<(), LogError> {
    let mut layers = vec![format_layer(&config, io::stderr, true)];

    if let Some(path) = &config.file_path {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        layers.push(format_layer(&config, Mutex::new(file), false));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(config.filter())
        .try_init()
        .map_err(|e| LogError::InitError(e.to_string()))
}

type BoxedLayer = Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>;

fn format_layer<W>(config: &LogConfig, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    match config.format {
        LogFormat::Pretty => layer.pretty().with_ansi(ansi).boxed(),
        LogFormat::Compact => layer.compact().with_ansi(ansi).boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// Logging errors.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to initialize logging: {0}")]
    InitError(String),

    #[error("failed to open log file: {0}")]
    FileError(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_case::test_case;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test_case("info", Some(LogLevel::Info))]
    #[test_case("DEBUG", Some(LogLevel::Debug))]
    #[test_case("Warning", Some(LogLevel::Warn))]
    #[test_case(" error ", Some(LogLevel::Error))]
    #[test_case("trace", Some(LogLevel::Trace))]
    #[test_case("loud", None)]
    fn test_log_level_parse(input: &str, expected: Option<LogLevel>) {
        assert_eq!(LogLevel::parse(input), expected);
    }

    #[test_case(0, false, LogLevel::Warn)]
    #[test_case(1, false, LogLevel::Info)]
    #[test_case(2, false, LogLevel::Debug)]
    #[test_case(5, false, LogLevel::Trace)]
    #[test_case(3, true, LogLevel::Error ; "quiet wins")]
    fn test_from_verbosity(verbose: u8, quiet: bool, expected: LogLevel) {
        assert_eq!(LogLevel::from_verbosity(verbose, quiet), expected);
    }

    #[test]
    fn test_level_filter_conversion() {
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::TRACE);
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::WARN);
        assert_eq!(LevelFilter::from(LogLevel::Error), LevelFilter::ERROR);
    }

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.file_path.is_none());
        assert!(!config.source_location);
        assert!(config.directives.is_none());
    }

    #[test]
    fn test_config_from_lookup() {
        let config = LogConfig::from_lookup(lookup(&[
            ("LINTHOOK_LOG_LEVEL", "debug"),
            ("LINTHOOK_LOG_FORMAT", "json"),
            ("LINTHOOK_LOG_FILE", "/tmp/linthook.log"),
            ("LINTHOOK_LOG_SOURCE", "true"),
            ("RUST_LOG", "trace"),
        ]));
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file_path, Some(PathBuf::from("/tmp/linthook.log")));
        assert!(config.source_location);
        assert!(config.directives.is_none());
    }

    #[test]
    fn test_rust_log_fallback() {
        let config = LogConfig::from_lookup(lookup(&[("RUST_LOG", "info")]));
        assert_eq!(config.level, LogLevel::Info);

        let config = LogConfig::from_lookup(lookup(&[("RUST_LOG", "linthook_dispatch=trace")]));
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.directives.as_deref(), Some("linthook_dispatch=trace"));
    }

    #[test]
    fn test_unknown_values_keep_defaults() {
        let config = LogConfig::from_lookup(lookup(&[
            ("LINTHOOK_LOG_LEVEL", "chatty"),
            ("LINTHOOK_LOG_FORMAT", "xml"),
        ]));
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn test_with_level_clears_directives() {
        let config = LogConfig {
            directives: Some("debug".into()),
            ..LogConfig::default()
        }
        .with_level(LogLevel::Error);
        assert_eq!(config.level, LogLevel::Error);
        assert!(config.directives.is_none());
    }
}
