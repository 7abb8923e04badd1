//! Environment-derived configuration locations.

use std::env;
use std::path::PathBuf;

/// Environment variable names.
pub mod vars {
    // Configuration
    pub const LINTHOOK_CONFIG_DIR: &str = "LINTHOOK_CONFIG_DIR";
    pub const LINTHOOK_FORMATTERS_CONFIG: &str = "LINTHOOK_FORMATTERS_CONFIG";
    pub const LINTHOOK_VALIDATORS_CONFIG: &str = "LINTHOOK_VALIDATORS_CONFIG";

    // Logging
    pub const LINTHOOK_LOG_LEVEL: &str = "LINTHOOK_LOG_LEVEL";
    pub const LINTHOOK_LOG_FORMAT: &str = "LINTHOOK_LOG_FORMAT";
    pub const LINTHOOK_LOG_FILE: &str = "LINTHOOK_LOG_FILE";
    pub const LINTHOOK_LOG_SOURCE: &str = "LINTHOOK_LOG_SOURCE";

    // System
    pub const HOME: &str = "HOME";
    pub const USER: &str = "USER";
    pub const RUST_LOG: &str = "RUST_LOG";
}

/// File name of the formatter config.
pub const FORMATTERS_FILE: &str = "formatters.jsonc";
/// File name of the validator config.
pub const VALIDATORS_FILE: &str = "validators.jsonc";

/// Locations of the two dispatch config files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub formatters: PathBuf,
    pub validators: PathBuf,
}

impl ConfigPaths {
    /// Both files inside one directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            formatters: dir.join(FORMATTERS_FILE),
            validators: dir.join(VALIDATORS_FILE),
        }
    }

    /// Resolve from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Resolve using an arbitrary variable lookup.
    ///
    /// Per-file variables win over the directory variable, which wins over
    /// `~/.config/linthook`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.is_empty());

        let dir = non_empty(vars::LINTHOOK_CONFIG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let home = non_empty(vars::HOME)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| home_dir(non_empty(vars::USER)));
                default_dir(home)
            });

        let mut paths = Self::in_dir(dir);
        if let Some(path) = non_empty(vars::LINTHOOK_FORMATTERS_CONFIG) {
            paths.formatters = PathBuf::from(path);
        }
        if let Some(path) = non_empty(vars::LINTHOOK_VALIDATORS_CONFIG) {
            paths.validators = PathBuf::from(path);
        }
        paths
    }
}

/// `<home>/.config/linthook`.
pub fn default_dir(home: impl Into<PathBuf>) -> PathBuf {
    home.into().join(".config").join("linthook")
}

fn home_dir(user: Option<String>) -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/home").join(user.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn test_home_default() {
        let paths = ConfigPaths::from_lookup(lookup(&[("HOME", "/home/dev")]));
        assert_eq!(
            paths.formatters,
            PathBuf::from("/home/dev/.config/linthook/formatters.jsonc")
        );
        assert_eq!(
            paths.validators,
            PathBuf::from("/home/dev/.config/linthook/validators.jsonc")
        );
    }

    #[test]
    fn test_config_dir_override() {
        let paths = ConfigPaths::from_lookup(lookup(&[
            ("HOME", "/home/dev"),
            ("LINTHOOK_CONFIG_DIR", "/etc/linthook"),
        ]));
        assert_eq!(paths, ConfigPaths::in_dir("/etc/linthook"));
    }

    #[test]
    fn test_per_file_override() {
        let paths = ConfigPaths::from_lookup(lookup(&[
            ("LINTHOOK_CONFIG_DIR", "/etc/linthook"),
            ("LINTHOOK_VALIDATORS_CONFIG", "/tmp/v.jsonc"),
        ]));
        assert_eq!(paths.formatters, PathBuf::from("/etc/linthook/formatters.jsonc"));
        assert_eq!(paths.validators, PathBuf::from("/tmp/v.jsonc"));
    }

    #[test]
    fn test_empty_values_ignored() {
        let paths = ConfigPaths::from_lookup(lookup(&[
            ("HOME", "/home/dev"),
            ("LINTHOOK_CONFIG_DIR", ""),
        ]));
        assert_eq!(paths, ConfigPaths::in_dir("/home/dev/.config/linthook"));
    }
}
