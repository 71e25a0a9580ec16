//! Command line definition
//!
//! Lives in the library so `xtask` can render the man page from the same
//! definition the binary parses.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[cfg(not(feature = "release"))]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    " ",
    env!("STORYPLAY_BUILD_DATE"),
    ")"
);

#[cfg(feature = "release")]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("STORYPLAY_BUILD_DATE"),
    ")"
);

#[derive(Debug, Parser)]
#[command(name = "storyplay")]
#[command(version = VERSION)]
#[command(about = "Play ephemeral stories in the terminal", long_about = None)]
pub struct Cli {
    /// Log engine activity to stderr (overrides STORYPLAY_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Play a subject's stories
    Play {
        /// Subject whose stories to play
        subject: String,

        /// Stories directory (defaults to the configured one)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Print one line per item instead of the full-screen player
        #[arg(long)]
        plain: bool,

        /// Append reactions to this JSONL file
        #[arg(long)]
        reactions: Option<PathBuf>,
    },

    /// List a subject's stories without playing them
    Inspect {
        /// Subject whose stories to list
        subject: String,

        /// Stories directory (defaults to the configured one)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file location
    Path,
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
