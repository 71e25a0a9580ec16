//! Development tasks for storyplay.
//!
//! Run with `cargo run -p xtask -- <task>`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_mangen::Man;

use storyplay::cli::Cli;

#[derive(Parser)]
#[command(name = "xtask")]
struct Tasks {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Generate man pages for storyplay and its subcommands
    Man {
        /// Output directory
        #[arg(long, default_value = "target/man")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    match Tasks::parse().task {
        Task::Man { out } => generate_man(&out),
    }
}

fn generate_man(out: &Path) -> Result<()> {
    fs::create_dir_all(out).with_context(|| format!("Failed to create {}", out.display()))?;

    let command = Cli::command();
    write_page(out, command.get_name(), Man::new(command.clone()))?;

    for sub in command.get_subcommands() {
        let name = format!("{}-{}", command.get_name(), sub.get_name());
        write_page(out, &name, Man::new(sub.clone()))?;
    }
    Ok(())
}

fn write_page(out: &Path, name: &str, man: Man) -> Result<()> {
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;
    let path = out.join(format!("{}.1", name));
    fs::write(&path, buffer).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}
