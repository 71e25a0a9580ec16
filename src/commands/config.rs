//! Config subcommands handler

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

use storyplay::Config;

const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Show the effective configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show() -> Result<()> {
    let config = Config::load()?;
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Print where the config file lives.
#[cfg(not(tarpaulin_include))]
pub fn handle_path() -> Result<()> {
    let path = Config::config_path()?;
    println!("{}", path.display());
    Ok(())
}

/// Write a config file with default settings.
///
/// An existing file is only replaced with `--force` or after confirmation.
#[cfg(not(tarpaulin_include))]
pub fn handle_init(force: bool) -> Result<()> {
    let path = Config::config_path()?;
    let config = Config::default();

    if path.exists() && !force {
        println!("Config file already exists at {}", path.display());
        if !prompt_confirmation("Replace it with default settings?")? {
            println!("No changes made.");
            return Ok(());
        }
    }

    print_preview(&config.to_toml()?);
    config
        .save_to(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Config written to {}", path.display());
    Ok(())
}

/// Print the new file content as additions.
fn print_preview(content: &str) {
    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        println!("{}+ {}{}", GREEN, line, RESET);
    }
}

/// Prompt user for yes/no confirmation.
///
/// Returns true if user confirms (y/yes), false otherwise.
/// If stdin is not a TTY (non-interactive), returns false.
fn prompt_confirmation(message: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        println!("Non-interactive mode: use --force to overwrite");
        return Ok(false);
    }

    print!("{} [y/N] ", message);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
