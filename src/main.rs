//! storyplay binary entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use storyplay::cli::{Cli, Commands, ConfigAction};

mod commands;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "STORYPLAY_LOG";

/// Log to stderr so plain playback output stays clean on stdout.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("storyplay=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Play {
            subject,
            dir,
            plain,
            reactions,
        } => commands::play::handle(commands::play::PlayArgs {
            subject,
            dir,
            plain,
            reactions,
        }),
        Commands::Inspect { subject, dir } => commands::inspect::handle(subject, dir),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::handle_show(),
            ConfigAction::Path => commands::config::handle_path(),
            ConfigAction::Init { force } => commands::config::handle_init(force),
        },
        Commands::Completions { shell } => commands::completions::handle(shell),
    }
}
