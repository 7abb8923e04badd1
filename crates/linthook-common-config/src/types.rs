//! Configuration types.
//!
//! The same shape serves both the formatter and the validator files: the
//! top-level language table is keyed `formatters` in one and `validators`
//! in the other, and each language's tool table is keyed `tools` or
//! `validators` likewise.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Placeholder substituted with the target file path in argument templates.
pub const FILEPATH_TOKEN: &str = "{filepath}";

/// Reads `null` as the type's default.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads `null` as `true`.
fn null_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Root configuration for one dispatch subsystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Descriptive metadata.
    pub metadata: Metadata,
    /// Language name → tools available for it.
    #[serde(alias = "formatters", alias = "validators")]
    pub languages: BTreeMap<String, LanguageEntry>,
    /// File extension (with leading dot) → language name.
    pub extensions: BTreeMap<String, String>,
    /// Global behavior flags.
    pub config: Behavior,
}

impl DispatchConfig {
    /// Language mapped to an extension, if any.
    pub fn language_for(&self, ext: &str) -> Option<&str> {
        self.extensions.get(ext).map(String::as_str)
    }

    /// Tool table for a language, if any.
    pub fn language(&self, name: &str) -> Option<&LanguageEntry> {
        self.languages.get(name)
    }

    /// Problems worth warning about. None of them stop the config from
    /// being used; an unmatched entry simply resolves to nothing.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for (ext, language) in &self.extensions {
            if !ext.starts_with('.') {
                issues.push(format!("extension `{ext}` has no leading dot"));
            }
            if !self.languages.contains_key(language) {
                issues.push(format!(
                    "extension `{ext}` maps to unknown language `{language}`"
                ));
            }
        }

        for (language, entry) in &self.languages {
            if let Some(primary) = entry.primary() {
                if !entry.tools.contains_key(primary) {
                    issues.push(format!(
                        "language `{language}` names primary `{primary}` which has no tool entry"
                    ));
                }
            }

            for (name, tool) in &entry.tools {
                if tool.command.is_empty() {
                    issues.push(format!("tool `{language}.{name}` has no command"));
                }
                if !tool.targets_file() && tool.working_dir != WorkingDir::ProjectRoot {
                    issues.push(format!(
                        "tool `{language}.{name}` never receives the file path ({FILEPATH_TOKEN} missing from args)"
                    ));
                }
            }
        }

        issues
    }
}

/// Descriptive metadata block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The tools available for one language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageEntry {
    /// Name of the primary tool (a key of `tools`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    /// Language description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tool name → definition.
    #[serde(alias = "validators")]
    pub tools: BTreeMap<String, ToolDefinition>,
}

impl LanguageEntry {
    /// Primary tool name, treating an empty string as unset.
    pub fn primary(&self) -> Option<&str> {
        self.primary.as_deref().filter(|p| !p.is_empty())
    }

    /// Enabled tools other than the primary, in name order.
    pub fn alternatives(&self) -> impl Iterator<Item = (&str, &ToolDefinition)> {
        let primary = self.primary();
        self.tools
            .iter()
            .filter(move |(name, tool)| Some(name.as_str()) != primary && tool.is_usable())
            .map(|(name, tool)| (name.as_str(), tool))
    }
}

/// One external tool capable of acting on a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolDefinition {
    /// Executable name.
    #[serde(deserialize_with = "null_default")]
    pub command: String,
    /// Argument template; `{filepath}` is replaced with the target path.
    #[serde(deserialize_with = "null_default")]
    pub args: Vec<String>,
    /// Whether the tool may be selected. Entries must opt in.
    #[serde(deserialize_with = "null_default")]
    pub enabled: bool,
    /// Category tag such as `syntax` or `linting`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// How a failing run of this tool should be weighed.
    #[serde(deserialize_with = "null_default")]
    pub severity: Severity,
    /// Working directory policy.
    #[serde(deserialize_with = "null_default")]
    pub working_dir: WorkingDir,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Command line that checks whether the tool is installed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_availability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ToolDefinition {
    /// Create an enabled tool.
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
            enabled: true,
            ..Self::default()
        }
    }

    /// Set the category tag.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the working directory policy.
    pub fn working_dir(mut self, working_dir: WorkingDir) -> Self {
        self.working_dir = working_dir;
        self
    }

    /// Set the severity.
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Mark the tool disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Enabled and has something to run.
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.command.is_empty()
    }

    /// Whether any argument carries the file path placeholder.
    pub fn targets_file(&self) -> bool {
        self.args.iter().any(|arg| arg.contains(FILEPATH_TOKEN))
    }
}

/// Working directory policy for a tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkingDir {
    /// Run in the caller's working directory.
    #[default]
    Inherit,
    /// Run in the nearest ancestor containing a project marker.
    ProjectRoot,
    /// Run in a fixed directory.
    Explicit(PathBuf),
}

impl From<String> for WorkingDir {
    fn from(value: String) -> Self {
        match value.trim() {
            "" => Self::Inherit,
            "project_root" => Self::ProjectRoot,
            other => Self::Explicit(PathBuf::from(other)),
        }
    }
}

impl From<WorkingDir> for String {
    fn from(value: WorkingDir) -> Self {
        match value {
            WorkingDir::Inherit => String::new(),
            WorkingDir::ProjectRoot => "project_root".to_string(),
            WorkingDir::Explicit(path) => path.to_string_lossy().into_owned(),
        }
    }
}

/// Severity of a tool's findings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "warning" | "warn" => Self::Warning,
            _ => Self::Error,
        }
    }
}

impl From<Severity> for String {
    fn from(value: Severity) -> Self {
        match value {
            Severity::Error => "error".to_string(),
            Severity::Warning => "warning".to_string(),
        }
    }
}

/// What to do when the primary tool is unusable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FallbackBehavior {
    /// Go straight to the built-in defaults.
    #[default]
    Skip,
    /// Try the language's other enabled tools first.
    TryAlternatives,
}

impl From<String> for FallbackBehavior {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "try_alternatives" => Self::TryAlternatives,
            _ => Self::Skip,
        }
    }
}

impl From<FallbackBehavior> for String {
    fn from(value: FallbackBehavior) -> Self {
        match value {
            FallbackBehavior::Skip => "skip".to_string(),
            FallbackBehavior::TryAlternatives => "try_alternatives".to_string(),
        }
    }
}

/// How strictly validation failures are judged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Strictness {
    #[default]
    Permissive,
    /// Also fail when a known language has no validator.
    Strict,
    /// Only tools with `error` severity can fail a file.
    ErrorOnly,
}

impl From<String> for Strictness {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "strict" => Self::Strict,
            "error_only" => Self::ErrorOnly,
            _ => Self::Permissive,
        }
    }
}

impl From<Strictness> for String {
    fn from(value: Strictness) -> Self {
        match value {
            Strictness::Permissive => "permissive".to_string(),
            Strictness::Strict => "strict".to_string(),
            Strictness::ErrorOnly => "error_only".to_string(),
        }
    }
}

/// Global behavior flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Behavior {
    /// Formatting failures should fail the caller.
    #[serde(deserialize_with = "null_default")]
    pub fail_on_error: bool,
    #[serde(deserialize_with = "null_default")]
    pub fallback_behavior: FallbackBehavior,
    /// Honor per-project tool configs (`.prettierrc` and friends).
    #[serde(deserialize_with = "null_true")]
    pub respect_project_configs: bool,
    #[serde(deserialize_with = "null_default")]
    pub strictness: Strictness,
    /// A known language without a validator counts as invalid.
    #[serde(deserialize_with = "null_default")]
    pub fail_on_missing_validator: bool,
    /// Run every enabled validator instead of only the primary.
    #[serde(deserialize_with = "null_default")]
    pub run_all_validators: bool,
    /// Keep only findings that mention the validated file.
    #[serde(deserialize_with = "null_default")]
    pub filter_by_file: bool,
    /// Per-tool timeout; zero or negative disables it.
    #[serde(deserialize_with = "null_default")]
    pub timeout_seconds: i64,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            fail_on_error: false,
            fallback_behavior: FallbackBehavior::default(),
            respect_project_configs: true,
            strictness: Strictness::default(),
            fail_on_missing_validator: false,
            run_all_validators: false,
            filter_by_file: false,
            timeout_seconds: 0,
        }
    }
}

impl Behavior {
    /// Configured timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        u64::try_from(self.timeout_seconds)
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Whether a language with no validator should fail validation.
    pub fn missing_validator_fails(&self) -> bool {
        self.fail_on_missing_validator || self.strictness == Strictness::Strict
    }
}
