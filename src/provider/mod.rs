//! Content providers
//!
//! The playback engine never loads stories itself; it asks a
//! `ContentProvider` for the set belonging to a subject. Two providers ship
//! with the crate:
//!
//! - `DirectoryProvider`: one JSON story file per subject in a directory
//! - `MemoryProvider`: story sets held in memory (embedding, tests)

mod directory;
mod memory;

pub use directory::DirectoryProvider;
pub use memory::MemoryProvider;

use std::path::PathBuf;

use crate::story::{StorySet, SubjectId};

/// Errors a content provider can report.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("No stories found for '{subject}'")]
    NotFound { subject: SubjectId },

    #[error("Failed to read story file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed story file {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("Content provider unavailable: {0}")]
    Unavailable(String),
}

/// Source of story sets.
///
/// Each call produces a fresh `StorySet`; the engine never mutates it.
pub trait ContentProvider {
    /// Fetch all stories for `subject`, in playback order.
    fn fetch_story_set(&self, subject: &SubjectId) -> Result<StorySet, FetchError>;
}

impl<T: ContentProvider + ?Sized> ContentProvider for &T {
    fn fetch_story_set(&self, subject: &SubjectId) -> Result<StorySet, FetchError> {
        (**self).fetch_story_set(subject)
    }
}
