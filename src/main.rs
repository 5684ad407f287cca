//! conv2md binary entry point.

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use conv2md::cli::{Cli, Commands, ConfigCommands};
use conv2md::{Config, ConversationParseError, ErrorKind, GenerationError};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // A broken config file should not block conversion; report and use defaults
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("warning: {:#}", e);
            Config::default()
        }
    };
    conv2md::logging::init(cli.verbose, &config.logging.level);

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match error_kind(&e) {
                Some(kind) => eprintln!("error ({}): {:#}", kind, e),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Convert(args) => commands::convert::handle(&args, config),
        Commands::Web { url } => commands::convert::handle_web(&url),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(config),
            ConfigCommands::Edit => commands::config::handle_edit(),
            ConfigCommands::Path => commands::config::handle_path(),
        },
        Commands::Completions { shell } => commands::completions::handle(shell),
    }
}

/// Taxonomy kind of the first conversion error in the chain.
fn error_kind(err: &anyhow::Error) -> Option<ErrorKind> {
    err.chain().find_map(|cause| {
        cause
            .downcast_ref::<GenerationError>()
            .map(GenerationError::kind)
            .or_else(|| {
                cause
                    .downcast_ref::<ConversationParseError>()
                    .map(ConversationParseError::kind)
            })
    })
}
