//! Compiled-in tool tables.
//!
//! Used whenever the config file is absent, broken, or has nothing usable
//! for a language. Every extension listed here maps to a language that has
//! a tool in the same table.

use linthook_common_config::{Severity, ToolDefinition, WorkingDir};

/// One built-in tool.
#[derive(Debug, Clone, Copy)]
pub struct FallbackTool {
    pub language: &'static str,
    pub name: &'static str,
    pub command: &'static str,
    pub args: &'static [&'static str],
    pub kind: Option<&'static str>,
    pub project_root: bool,
}

impl FallbackTool {
    /// Materialize as an enabled tool definition.
    pub fn definition(&self) -> ToolDefinition {
        let mut tool = ToolDefinition::new(self.command, self.args.iter().copied());
        if let Some(kind) = self.kind {
            tool = tool.kind(kind);
        }
        if self.project_root {
            tool = tool.working_dir(WorkingDir::ProjectRoot);
        }
        tool.severity(Severity::Error)
    }
}

/// Extension and tool tables for one subsystem.
#[derive(Debug)]
pub struct FallbackTable {
    extensions: &'static [(&'static str, &'static str)],
    tools: &'static [FallbackTool],
}

impl FallbackTable {
    /// Language for an extension (leading dot included).
    pub fn language_for(&self, ext: &str) -> Option<&'static str> {
        self.extensions
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, language)| *language)
    }

    /// Built-in tool for a language.
    pub fn tool_for(&self, language: &str) -> Option<&'static FallbackTool> {
        self.tools.iter().find(|t| t.language == language)
    }

    /// All extensions with a built-in mapping.
    pub fn extensions(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.extensions.iter().copied()
    }

    /// All built-in tools.
    pub fn tools(&self) -> &'static [FallbackTool] {
        self.tools
    }
}

const fn tool(
    language: &'static str,
    name: &'static str,
    command: &'static str,
    args: &'static [&'static str],
) -> FallbackTool {
    FallbackTool {
        language,
        name,
        command,
        args,
        kind: None,
        project_root: false,
    }
}

/// Built-in formatters.
pub static FORMATTERS: FallbackTable = FallbackTable {
    extensions: &[
        (".rs", "rust"),
        (".go", "go"),
        (".py", "python"),
        (".pyw", "python"),
        (".js", "javascript"),
        (".jsx", "javascript"),
        (".ts", "javascript"),
        (".tsx", "javascript"),
        (".mjs", "javascript"),
        (".c", "c_cpp"),
        (".h", "c_cpp"),
        (".cc", "c_cpp"),
        (".cpp", "c_cpp"),
        (".hpp", "c_cpp"),
        (".rb", "ruby"),
        (".java", "java"),
        (".sh", "shell"),
        (".bash", "shell"),
        (".zsh", "shell"),
    ],
    tools: &[
        tool("rust", "rustfmt", "rustfmt", &["{filepath}"]),
        tool("go", "gofmt", "gofmt", &["-w", "{filepath}"]),
        tool("python", "black", "black", &["{filepath}"]),
        tool("javascript", "prettier", "npx", &["prettier", "--write", "{filepath}"]),
        tool("c_cpp", "clang_format", "clang-format", &["-i", "{filepath}"]),
        tool("ruby", "rubocop", "rubocop", &["--auto-correct", "{filepath}"]),
        tool("java", "google_java_format", "google-java-format", &["--replace", "{filepath}"]),
        tool("shell", "shfmt", "shfmt", &["-w", "{filepath}"]),
    ],
};

/// Built-in validators.
pub static VALIDATORS: FallbackTable = FallbackTable {
    extensions: &[
        (".go", "go"),
        (".rs", "rust"),
        (".py", "python"),
        (".pyw", "python"),
        (".js", "javascript"),
        (".jsx", "javascript"),
        (".ts", "javascript"),
        (".tsx", "javascript"),
        (".mjs", "javascript"),
        (".sh", "shell"),
        (".bash", "shell"),
        (".zsh", "shell"),
        (".json", "json"),
        (".jsonc", "json"),
        (".yaml", "yaml"),
        (".yml", "yaml"),
        (".toml", "toml"),
    ],
    tools: &[
        FallbackTool {
            kind: Some("syntax"),
            ..tool("go", "go_vet", "go", &["vet", "{filepath}"])
        },
        FallbackTool {
            kind: Some("compilation"),
            project_root: true,
            ..tool("rust", "cargo_check", "cargo", &["check", "--message-format=short"])
        },
        FallbackTool {
            kind: Some("syntax"),
            ..tool("python", "py_compile", "python3", &["-m", "py_compile", "{filepath}"])
        },
        FallbackTool {
            kind: Some("linting"),
            ..tool("javascript", "eslint", "npx", &["eslint", "{filepath}"])
        },
        FallbackTool {
            kind: Some("linting"),
            ..tool("shell", "shellcheck", "shellcheck", &["{filepath}"])
        },
        FallbackTool {
            kind: Some("syntax"),
            ..tool("json", "jq", "jq", &["empty", "{filepath}"])
        },
        FallbackTool {
            kind: Some("linting"),
            ..tool("yaml", "yamllint", "yamllint", &["-f", "parsable", "{filepath}"])
        },
        FallbackTool {
            kind: Some("syntax"),
            ..tool("toml", "toml_test", "toml-test", &["decode", "{filepath}"])
        },
    ],
};
