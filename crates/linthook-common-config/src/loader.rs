//! Configuration file loading.
//!
//! Loading never fails from the caller's point of view. A missing or broken
//! file produces a [`ConfigState`] that says why, and callers fall back to
//! their built-in defaults.

use crate::jsonc;
use crate::types::DispatchConfig;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSONC at line {line}, column {column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

/// Outcome of a load attempt.
///
/// `Missing` and `Invalid` behave the same downstream; they stay distinct
/// so diagnostics can tell "no file" from "bad file".
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigState {
    /// The file was read and parsed.
    Loaded(DispatchConfig),
    /// No file at the path.
    Missing { path: PathBuf },
    /// The file exists but could not be read or parsed.
    Invalid { path: PathBuf, reason: String },
}

impl ConfigState {
    /// The parsed config, if loading succeeded.
    pub fn config(&self) -> Option<&DispatchConfig> {
        match self {
            Self::Loaded(config) => Some(config),
            _ => None,
        }
    }

    /// Whether a config is available.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Consume into the parsed config.
    pub fn into_config(self) -> Option<DispatchConfig> {
        match self {
            Self::Loaded(config) => Some(config),
            _ => None,
        }
    }
}

impl Default for ConfigState {
    fn default() -> Self {
        Self::Missing {
            path: PathBuf::new(),
        }
    }
}

impl From<DispatchConfig> for ConfigState {
    fn from(config: DispatchConfig) -> Self {
        Self::Loaded(config)
    }
}

impl fmt::Display for ConfigState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded(config) => write!(
                f,
                "loaded ({} languages, {} extensions)",
                config.languages.len(),
                config.extensions.len()
            ),
            Self::Missing { path } => write!(f, "missing: {}", path.display()),
            Self::Invalid { path, reason } => write!(f, "invalid: {} ({reason})", path.display()),
        }
    }
}

/// Configuration loader for one JSONC file.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the given file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// File this loader reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and parse, surfacing the reason for failure.
    pub fn try_load(&self) -> Result<DispatchConfig, ConfigError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                ConfigError::ReadError {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        jsonc::parse(&contents)
    }

    /// Load the file, collapsing every failure into a [`ConfigState`].
    pub fn load(&self) -> ConfigState {
        match self.try_load() {
            Ok(config) => {
                for issue in config.issues() {
                    warn!(path = %self.path.display(), "{issue}");
                }
                debug!(
                    path = %self.path.display(),
                    languages = config.languages.len(),
                    "loaded dispatch config"
                );
                ConfigState::Loaded(config)
            }
            Err(ConfigError::NotFound { path }) => {
                debug!(path = %path.display(), "no dispatch config, using built-in defaults");
                ConfigState::Missing { path }
            }
            Err(err) => {
                warn!(path = %self.path.display(), "ignoring dispatch config: {err}");
                ConfigState::Invalid {
                    path: self.path.clone(),
                    reason: err.to_string(),
                }
            }
        }
    }
}

/// Load a config file, or nothing if it is missing or malformed.
pub fn load_config(path: impl AsRef<Path>) -> Option<DispatchConfig> {
    ConfigLoader::new(path).load().into_config()
}
