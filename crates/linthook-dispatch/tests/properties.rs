//! Resolution and result properties that must hold with or without config.

use linthook_common_config::{ConfigLoader, ConfigState, ToolDefinition};
use linthook_dispatch::display::Palette;
use linthook_dispatch::fallback::{FORMATTERS, VALIDATORS};
use linthook_dispatch::{
    build_command, Formatter, Resolver, Subsystem, Tier, ValidationResult, Validator,
};
use linthook_test_utils::{single_tool_config, temp_dir, write_config, FakeTool};
use std::path::Path;

#[test]
fn fallback_covers_every_listed_extension_without_config() {
    let missing = ConfigLoader::new("/nonexistent/linthook/formatters.jsonc").load();
    assert!(!missing.is_loaded());

    for (subsystem, table) in [(Subsystem::Format, &FORMATTERS), (Subsystem::Validate, &VALIDATORS)] {
        let resolver = Resolver::new(subsystem, missing.clone());
        for (ext, _) in table.extensions() {
            let language = resolver
                .resolve_language(ext)
                .unwrap_or_else(|| panic!("{ext} has no language"));
            let tool = resolver
                .resolve_tool(&language)
                .unwrap_or_else(|| panic!("{ext} ({language}) has no tool"));
            assert_eq!(tool.source, Tier::Fallback);
        }
    }
}

#[test]
fn config_primary_beats_fallback() {
    let config = single_tool_config(
        "go",
        ".go",
        "goimports",
        ToolDefinition::new("goimports", ["-w", "{filepath}"]),
    );
    let resolver = Resolver::new(Subsystem::Format, ConfigState::Loaded(config));

    let tool = resolver.resolve_tool("go").unwrap();
    assert_eq!(tool.tool.command, "goimports");
    assert_ne!(tool.tool.command, FORMATTERS.tool_for("go").unwrap().command);
}

#[test]
fn disabled_primary_behaves_like_absent_entry() {
    let config = single_tool_config(
        "go",
        ".go",
        "goimports",
        ToolDefinition::new("goimports", ["-w", "{filepath}"]).disabled(),
    );
    let with_disabled = Resolver::new(Subsystem::Format, ConfigState::Loaded(config));
    let without_config = Resolver::new(Subsystem::Format, ConfigState::default());

    assert_eq!(
        with_disabled.resolve_tool("go"),
        without_config.resolve_tool("go")
    );
}

#[tokio::test]
async fn unknown_extension_is_never_an_error() {
    let formatter = Formatter::default();
    let validator = Validator::default();

    assert_eq!(formatter.language_for_extension(".xyz123"), "");
    assert_eq!(validator.language_for_extension(".xyz123"), "");

    let formatted = formatter.format_file("/tmp/a.xyz123", ".xyz123").await;
    assert!(!formatted.formatted);
    assert!(formatted.error.is_none());

    let validated = validator.validate_file("/tmp/a.xyz", ".xyz").await;
    assert!(validated.valid);
    assert!(validated.warnings.is_empty());
}

#[test]
fn placeholder_in_two_slots_gets_same_path() {
    let config = single_tool_config(
        "go",
        ".go",
        "twice",
        ToolDefinition::new("twice", ["--src", "{filepath}", "--dst", "{filepath}"]),
    );
    let resolver = Resolver::new(Subsystem::Format, ConfigState::Loaded(config));
    let tool = resolver.resolve_tool("go").unwrap();

    let cmd = build_command(&tool, Path::new("/tmp/main.go"));
    assert_eq!(cmd.args, ["--src", "/tmp/main.go", "--dst", "/tmp/main.go"]);
}

#[test]
fn reporting_is_idempotent_and_silent_when_valid() {
    let palette = Palette::plain();
    let render = |result: &ValidationResult| {
        let mut buf = Vec::new();
        result.report_with(&mut buf, &palette).unwrap();
        String::from_utf8(buf).unwrap()
    };

    let valid = ValidationResult::unchecked("main.go", "go");
    assert_eq!(render(&valid), "");
    assert_eq!(render(&valid), "");

    let invalid = ValidationResult {
        valid: false,
        warnings: vec!["main.go:1:1: x".into()],
        ..ValidationResult::unchecked("main.go", "go")
    };
    assert_eq!(render(&invalid), render(&invalid));
}

#[test]
fn scenario_go_without_config() {
    let resolver = Resolver::new(Subsystem::Format, ConfigState::default());
    let language = resolver.resolve_language(".go").unwrap();
    assert_eq!(language, "go");

    let tool = resolver.resolve_tool(&language).unwrap();
    assert_eq!(tool.tool.command, "gofmt");

    let cmd = build_command(&tool, Path::new("/tmp/main.go"));
    assert_eq!(cmd.args, ["-w", "/tmp/main.go"]);
}

#[tokio::test]
async fn scenario_python_config_formats_with_black() {
    let dir = temp_dir();
    let black = FakeTool::new("black").install(dir.path());
    let config = single_tool_config("python", ".py", "black", black.definition(["{filepath}"]));
    let path = write_config(dir.path(), "formatters.jsonc", &config);
    let script = dir.path().join("script.py");
    std::fs::write(&script, "x=1\n").unwrap();

    let formatter = Formatter::load(&path);
    assert!(formatter.config_state().is_loaded());

    let result = formatter.format_file(&script, ".py").await;
    assert!(result.formatted, "{:?}", result.error);
    assert!(result.error.is_none());
    assert_eq!(result.formatter, "sh");
    assert!(black.was_run());
    assert_eq!(black.last_args().unwrap(), [script.to_string_lossy()]);
}

#[tokio::test]
async fn scenario_failing_validator_output_becomes_warnings() {
    let dir = temp_dir();
    let vet = FakeTool::new("vet")
        .stderr("main.go:10:2: unused variable\n")
        .exit_code(1)
        .install(dir.path());
    let config = single_tool_config("go", ".go", "go_vet", vet.definition(["{filepath}"]));
    let validator = Validator::new(ConfigState::Loaded(config));

    let result = validator.validate_file(dir.path().join("main.go"), ".go").await;
    assert!(!result.valid);
    assert_eq!(result.warnings, ["main.go:10:2: unused variable"]);
    assert_eq!(result.validator, "go_vet");
    assert_eq!(result.language, "go");
}

#[tokio::test]
async fn scenario_unknown_extension_validates_clean() {
    let result = Validator::default().validate_file("notes.xyz", ".xyz").await;
    assert_eq!(
        result,
        ValidationResult {
            valid: true,
            warnings: vec![],
            validator: String::new(),
            language: String::new(),
            file_path: "notes.xyz".into(),
        }
    );
}
