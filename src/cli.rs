//! Command-line interface definition.
//!
//! Lives in the library so `xtask` can render the man page from it.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;

#[cfg(not(feature = "release"))]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    " ",
    env!("CONV2MD_BUILD_DATE"),
    ")"
);

#[cfg(feature = "release")]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CONV2MD_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "conv2md")]
#[command(version = VERSION, about = "Convert conversation exports to Markdown")]
#[command(long_about = "conv2md turns JSON conversation exports into sanitized, \
deterministic Markdown documents with optional YAML frontmatter.")]
#[command(after_help = "EXAMPLES:
    conv2md convert -i chat.json                 Print Markdown to stdout
    conv2md convert -i chat.json -o out/         Write out/chat.md
    conv2md convert -i chat.json -m author=me    Add a frontmatter field")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a conversation JSON file to Markdown
    Convert(ConvertArgs),

    /// Convert a website to Markdown (not implemented yet)
    Web {
        /// Page URL
        url: String,
    },

    /// Inspect or edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    #[command(long_about = "Print a completion script for the given shell.\n\n\
EXAMPLES:\n    conv2md completions bash > ~/.local/share/bash-completion/completions/conv2md\n    \
conv2md completions zsh > ~/.zfunc/_conv2md")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Input conversation JSON file
    #[arg(short, long, value_name = "FILE|URL")]
    pub input: String,

    /// Output file (*.md) or directory; stdout when omitted
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Document title for the frontmatter (defaults to the input name)
    #[arg(long)]
    pub title: Option<String>,

    /// Extra frontmatter field, repeatable
    #[arg(short = 'm', long = "meta", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub meta: Vec<(String, String)>,

    /// Omit YAML frontmatter
    #[arg(long)]
    pub no_frontmatter: bool,

    /// Print conversion metrics as JSON to stderr
    #[arg(long)]
    pub metrics: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Show the effective configuration as TOML
    Show,
    /// Open the configuration file in $EDITOR
    Edit,
    /// Print the configuration file path
    Path,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }
    Ok((key.trim().to_string(), value.to_string()))
}
