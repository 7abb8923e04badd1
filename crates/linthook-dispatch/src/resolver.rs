//! Extension → language → tool resolution.
//!
//! Resolution walks an ordered chain of [`ToolSource`]s: the user's config
//! first, then the compiled-in table. The first source that yields wins.

use crate::fallback::FallbackTable;
use crate::Subsystem;
use linthook_common_config::{Behavior, ConfigState, FallbackBehavior, ToolDefinition};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Which tier of the chain produced a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// The language's primary tool in the config file.
    Config,
    /// An enabled non-primary tool from the config file.
    Alternative,
    /// The compiled-in table.
    Fallback,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Config => "config",
            Self::Alternative => "alternative",
            Self::Fallback => "fallback",
        })
    }
}

/// A tool chosen for a language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTool {
    /// Tool name (key in the config, or built-in name).
    pub name: String,
    /// Language it was resolved for.
    pub language: String,
    /// Definition to execute.
    pub tool: ToolDefinition,
    /// Tier that produced it.
    pub source: Tier,
}

/// Why the config did not yield a tool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigMiss {
    #[error("no config loaded")]
    NotLoaded,
    #[error("language not configured")]
    UnknownLanguage,
    #[error("no primary tool named")]
    NoPrimary,
    #[error("primary tool `{0}` has no definition")]
    PrimaryMissing(String),
    #[error("primary tool `{0}` is disabled")]
    PrimaryDisabled(String),
}

/// One link in the resolution chain.
pub trait ToolSource: Send + Sync + fmt::Debug {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Language mapped to an exact extension.
    fn language_for(&self, ext: &str) -> Option<String>;

    /// Tool for a language.
    fn resolve(&self, language: &str) -> Option<ResolvedTool>;
}

/// Tools from a loaded config file.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    state: Arc<ConfigState>,
}

impl ConfigSource {
    pub fn new(state: Arc<ConfigState>) -> Self {
        Self { state }
    }

    /// The primary tool for a language, or why there is none.
    pub fn tool_for(&self, language: &str) -> Result<ResolvedTool, ConfigMiss> {
        let config = self.state.config().ok_or(ConfigMiss::NotLoaded)?;
        let entry = config
            .language(language)
            .ok_or(ConfigMiss::UnknownLanguage)?;
        let primary = entry.primary().ok_or(ConfigMiss::NoPrimary)?;
        let tool = entry
            .tools
            .get(primary)
            .ok_or_else(|| ConfigMiss::PrimaryMissing(primary.to_string()))?;

        if !tool.is_usable() {
            return Err(ConfigMiss::PrimaryDisabled(primary.to_string()));
        }

        Ok(ResolvedTool {
            name: primary.to_string(),
            language: language.to_string(),
            tool: tool.clone(),
            source: Tier::Config,
        })
    }

    /// First enabled non-primary tool, in name order.
    pub fn alternative_for(&self, language: &str) -> Option<ResolvedTool> {
        let entry = self.state.config()?.language(language)?;
        entry
            .alternatives()
            .next()
            .map(|(name, tool)| ResolvedTool {
                name: name.to_string(),
                language: language.to_string(),
                tool: tool.clone(),
                source: Tier::Alternative,
            })
    }

    fn try_alternatives(&self) -> bool {
        self.state
            .config()
            .map(|c| c.config.fallback_behavior == FallbackBehavior::TryAlternatives)
            .unwrap_or(false)
    }
}

impl ToolSource for ConfigSource {
    fn name(&self) -> &'static str {
        "config"
    }

    fn language_for(&self, ext: &str) -> Option<String> {
        self.state.config()?.language_for(ext).map(str::to_string)
    }

    fn resolve(&self, language: &str) -> Option<ResolvedTool> {
        match self.tool_for(language) {
            Ok(tool) => Some(tool),
            Err(miss) => {
                debug!(language, reason = %miss, "config has no usable primary");
                let recoverable = !matches!(miss, ConfigMiss::NotLoaded | ConfigMiss::UnknownLanguage);
                if recoverable && self.try_alternatives() {
                    let alternative = self.alternative_for(language);
                    if let Some(alt) = &alternative {
                        debug!(language, tool = %alt.name, "using alternative tool");
                    }
                    alternative
                } else {
                    None
                }
            }
        }
    }
}

/// Tools from a compiled-in table.
#[derive(Debug, Clone, Copy)]
pub struct FallbackSource {
    table: &'static FallbackTable,
}

impl FallbackSource {
    pub fn new(table: &'static FallbackTable) -> Self {
        Self { table }
    }
}

impl ToolSource for FallbackSource {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn language_for(&self, ext: &str) -> Option<String> {
        self.table.language_for(ext).map(str::to_string)
    }

    fn resolve(&self, language: &str) -> Option<ResolvedTool> {
        self.table.tool_for(language).map(|t| ResolvedTool {
            name: t.name.to_string(),
            language: language.to_string(),
            tool: t.definition(),
            source: Tier::Fallback,
        })
    }
}

/// Resolution chain for one subsystem.
#[derive(Debug, Clone)]
pub struct Resolver {
    subsystem: Subsystem,
    state: Arc<ConfigState>,
    sources: Arc<Vec<Box<dyn ToolSource>>>,
}

impl Resolver {
    /// Config first, then the subsystem's compiled-in table.
    pub fn new(subsystem: Subsystem, state: ConfigState) -> Self {
        let state = Arc::new(state);
        let sources: Vec<Box<dyn ToolSource>> = vec![
            Box::new(ConfigSource::new(Arc::clone(&state))),
            Box::new(FallbackSource::new(subsystem.fallback_table())),
        ];
        Self {
            subsystem,
            state,
            sources: Arc::new(sources),
        }
    }

    pub fn subsystem(&self) -> Subsystem {
        self.subsystem
    }

    /// Loaded config state backing the first tier.
    pub fn config_state(&self) -> &ConfigState {
        &self.state
    }

    /// Behavior flags, or defaults when no config is loaded.
    pub fn behavior(&self) -> Behavior {
        self.state
            .config()
            .map(|c| c.config.clone())
            .unwrap_or_default()
    }

    /// Language for an extension.
    ///
    /// A bare extension such as `go` is treated as `.go`. An exact match in
    /// any tier wins over a lowercase retry.
    pub fn resolve_language(&self, ext: &str) -> Option<String> {
        let ext = normalize_extension(ext)?;
        let lower = ext.to_lowercase();

        let mut candidates = vec![ext.as_str()];
        if lower != ext {
            candidates.push(lower.as_str());
        }

        candidates.into_iter().find_map(|candidate| {
            self.sources.iter().find_map(|source| {
                let language = source.language_for(candidate)?;
                debug!(ext = candidate, %language, tier = source.name(), "resolved language");
                Some(language)
            })
        })
    }

    /// Tool for a language from the first tier that has one.
    pub fn resolve_tool(&self, language: &str) -> Option<ResolvedTool> {
        if language.is_empty() {
            return None;
        }
        let resolved = self.sources.iter().find_map(|source| source.resolve(language));
        match &resolved {
            Some(tool) => debug!(language, tool = %tool.name, tier = %tool.source, "resolved tool"),
            None => debug!(language, "no tool in any tier"),
        }
        resolved
    }

    /// Every language named by the config or the compiled-in table.
    pub fn known_languages(&self) -> BTreeSet<String> {
        let configured = self
            .state
            .config()
            .into_iter()
            .flat_map(|c| c.languages.keys().cloned());
        let built_in = self
            .subsystem
            .fallback_table()
            .tools()
            .iter()
            .map(|t| t.language.to_string());
        configured.chain(built_in).collect()
    }

    /// Every usable configured tool for a language, primary first.
    ///
    /// Falls back to [`Resolver::resolve_tool`] when the config offers
    /// nothing usable.
    pub fn tools_for(&self, language: &str) -> Vec<ResolvedTool> {
        let config = ConfigSource::new(Arc::clone(&self.state));
        let mut tools: Vec<ResolvedTool> = config.tool_for(language).into_iter().collect();

        if let Some(entry) = self.state.config().and_then(|c| c.language(language)) {
            tools.extend(entry.alternatives().map(|(name, tool)| ResolvedTool {
                name: name.to_string(),
                language: language.to_string(),
                tool: tool.clone(),
                source: Tier::Alternative,
            }));
        }

        if tools.is_empty() {
            tools.extend(self.resolve_tool(language));
        }
        tools
    }
}

fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim();
    match ext {
        "" | "." => None,
        e if e.starts_with('.') => Some(e.to_string()),
        e => Some(format!(".{e}")),
    }
}
