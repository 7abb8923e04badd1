//! linthook - format and validate files by extension
//!
//! Main entry point for the `linthook` binary.

use std::process::ExitCode;

use clap::Parser;
use linthook_common_log::{LogConfig, LogLevel};
use linthook_dispatch::CancellationToken;
use tracing::error;

mod cli;
mod commands;
mod error;
mod output;

use cli::Cli;
use error::CliError;

/// Application exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Exit {
    Success = 0,
    GeneralError = 1,
    ConfigError = 2,
    IoError = 3,
    ValidationError = 5,
    Interrupted = 130,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("failed to start async runtime: {e}");
            return Exit::GeneralError.into();
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => Exit::Success.into(),
        Err(e) => {
            error!(code = e.code(), "{e}");
            if let Some(hint) = e.hint() {
                eprintln!("hint: {hint}");
            }
            e.exit_code()
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let (token, watcher) = CancellationToken::new();

    // Ctrl-C kills in-flight tools instead of the whole process.
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let result = cli.execute(watcher).await;
    if token.is_cancelled() {
        return Err(CliError::Interrupted);
    }
    result
}

/// Environment settings apply unless `-v` or `-q` was given.
fn init_logging(cli: &Cli) {
    let mut config = LogConfig::from_env();
    if cli.verbose > 0 || cli.quiet {
        config = config.with_level(LogLevel::from_verbosity(cli.verbose, cli.quiet));
    }

    if let Err(e) = linthook_common_log::init(config) {
        eprintln!("warning: logging disabled: {e}");
    }
}
