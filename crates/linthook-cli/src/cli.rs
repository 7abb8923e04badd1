//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, ColorChoice, Parser, Subcommand, ValueHint};
use linthook_common_config::{ConfigLoader, ConfigPaths, ConfigState};
use linthook_dispatch::display::{self, Palette};
use linthook_dispatch::{CancellationWatcher, ExecOptions, Formatter, Validator};

use crate::commands::{
    CheckCommand, ConfigCommand, DoctorCommand, FormatCommand, ResolveCommand, ValidateCommand,
};
use crate::error::CliError;

/// linthook - format and validate files by extension
///
/// Maps a file's extension to a language, picks that language's formatter
/// or validator from the JSONC config (or the built-in defaults), and runs it.
#[derive(Debug, Parser)]
#[command(
    name = "linthook",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase verbosity level"
    )]
    pub verbose: u8,

    /// Only log errors; reports still print
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Only log errors (reports still print)"
    )]
    pub quiet: bool,

    /// When to use colors
    #[arg(
        long,
        global = true,
        default_value = "auto",
        value_enum,
        help = "When to use terminal colors"
    )]
    pub color: ColorChoice,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        value_enum,
        help = "Output format (text, json)"
    )]
    pub format: OutputFormat,

    /// Formatter config file
    #[arg(
        long,
        global = true,
        env = "LINTHOOK_FORMATTERS_CONFIG",
        value_hint = ValueHint::FilePath
    )]
    pub formatters_config: Option<PathBuf>,

    /// Validator config file
    #[arg(
        long,
        global = true,
        env = "LINTHOOK_VALIDATORS_CONFIG",
        value_hint = ValueHint::FilePath
    )]
    pub validators_config: Option<PathBuf>,

    /// Per-tool timeout in seconds, overriding the config's `timeout_seconds`;
    /// 0 disables it
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Format files in place
    #[command(visible_alias = "fmt")]
    Format(FormatCommand),

    /// Validate files and report findings
    Validate(ValidateCommand),

    /// Format, then validate (the post-write hook flow)
    Check(CheckCommand),

    /// Show which language and tools an extension resolves to
    Resolve(ResolveCommand),

    /// Inspect the dispatch config files
    Config(ConfigCommand),

    /// Check that every resolvable tool is installed
    Doctor(DoctorCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Shell completions generation
#[derive(Debug, Parser)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

impl Cli {
    /// Execute the selected command
    pub async fn execute(self, cancel: CancellationWatcher) -> Result<(), CliError> {
        display::set_color_choice(match self.color {
            ColorChoice::Auto => display::ColorChoice::Auto,
            ColorChoice::Always => display::ColorChoice::Always,
            ColorChoice::Never => display::ColorChoice::Never,
        });

        let mut paths = ConfigPaths::from_env();
        if let Some(path) = self.formatters_config {
            paths.formatters = path;
        }
        if let Some(path) = self.validators_config {
            paths.validators = path;
        }

        let ctx = CommandContext {
            paths,
            format: self.format,
            timeout: self.timeout,
            cancel,
        };

        match self.command {
            Command::Format(cmd) => cmd.execute(&ctx).await,
            Command::Validate(cmd) => cmd.execute(&ctx).await,
            Command::Check(cmd) => cmd.execute(&ctx).await,
            Command::Resolve(cmd) => cmd.execute(&ctx),
            Command::Config(cmd) => cmd.execute(&ctx),
            Command::Doctor(cmd) => cmd.execute(&ctx),
            Command::Completions(cmd) => cmd.execute(&ctx),
        }
    }
}

impl CompletionsCommand {
    /// Execute the completions command
    pub fn execute(&self, _ctx: &CommandContext) -> Result<(), CliError> {
        use clap::CommandFactory;
        use clap_complete::generate;
        use std::io;

        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(self.shell, &mut cmd, name, &mut io::stdout());
        Ok(())
    }
}

/// Context passed to all commands
#[derive(Debug)]
pub struct CommandContext {
    pub paths: ConfigPaths,
    pub format: OutputFormat,
    /// `--timeout` in seconds; `Some(0)` means no timeout at all.
    pub timeout: Option<u64>,
    pub cancel: CancellationWatcher,
}

impl CommandContext {
    pub fn formatters_state(&self) -> ConfigState {
        ConfigLoader::new(&self.paths.formatters).load()
    }

    pub fn validators_state(&self) -> ConfigState {
        ConfigLoader::new(&self.paths.validators).load()
    }

    /// Execution options from the command line.
    pub fn exec_options(&self) -> ExecOptions {
        let options = ExecOptions::new().cancel(self.cancel.clone());
        match self.timeout {
            Some(0) => options.no_timeout(),
            Some(secs) => options.timeout(Duration::from_secs(secs)),
            None => options,
        }
    }

    pub fn formatter(&self) -> Formatter {
        Formatter::with_options(self.formatters_state(), self.exec_options())
    }

    pub fn validator(&self) -> Validator {
        Validator::with_options(self.validators_state(), self.exec_options())
    }

    pub fn palette(&self) -> Palette {
        Palette::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "linthook",
            "validate",
            "main.go",
            "--format",
            "json",
            "--timeout",
            "30",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.timeout, Some(30));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Validate(_)));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["linthook", "-q", "-v", "resolve", ".go"]).is_err());
    }

    #[test]
    fn test_format_requires_files() {
        assert!(Cli::try_parse_from(["linthook", "format"]).is_err());
    }

    #[test]
    fn test_timeout_flag_maps_to_exec_options() {
        let (_token, cancel) = linthook_dispatch::CancellationToken::new();
        let mut ctx = CommandContext {
            paths: ConfigPaths::in_dir("/nonexistent"),
            format: OutputFormat::Text,
            timeout: None,
            cancel,
        };
        let config_timeout = Some(Duration::from_secs(1));

        assert_eq!(ctx.exec_options().or_timeout(config_timeout).timeout, config_timeout);

        ctx.timeout = Some(0);
        assert_eq!(ctx.exec_options().or_timeout(config_timeout).timeout, None);

        ctx.timeout = Some(30);
        assert_eq!(
            ctx.exec_options().or_timeout(config_timeout).timeout,
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_fmt_alias() {
        let cli = Cli::try_parse_from(["linthook", "fmt", "a.rs", "--ext", ".rs"]).unwrap();
        assert!(matches!(cli.command, Command::Format(_)));
    }
}
