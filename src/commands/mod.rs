//! Subcommand handlers for the `storyplay` binary.

pub mod completions;
pub mod config;
pub mod inspect;
pub mod play;

use std::path::PathBuf;

use anyhow::{Context, Result};
use storyplay::provider::DirectoryProvider;
use storyplay::story::SubjectId;
use storyplay::Config;

/// Directory provider for `dir`, or the configured stories directory.
pub(crate) fn directory_provider(config: &Config, dir: Option<PathBuf>) -> Result<DirectoryProvider> {
    let root = dir.unwrap_or_else(|| config.stories_dir());
    let defaults = config.duration_defaults()?;
    Ok(DirectoryProvider::new(root, defaults))
}

pub(crate) fn parse_subject(subject: String) -> Result<SubjectId> {
    SubjectId::new(subject).context("Subject must not be empty")
}
