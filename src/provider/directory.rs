//! Directory-backed content provider.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::{ContentProvider, FetchError};
use crate::files::filename::story_file_name;
use crate::story::{parse_story_file, DurationDefaults, StorySet, SubjectId};

/// Loads `<root>/<subject>.json` on every fetch.
///
/// The file is re-read each time so a new session always sees the latest
/// stories; an open session keeps the set it was started with.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
    defaults: DurationDefaults,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>, defaults: DurationDefaults) -> Self {
        Self {
            root: root.into(),
            defaults,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the story file for `subject`, if the subject id can name a file.
    pub fn story_path(&self, subject: &SubjectId) -> Option<PathBuf> {
        story_file_name(subject).ok().map(|name| self.root.join(name))
    }
}

impl ContentProvider for DirectoryProvider {
    fn fetch_story_set(&self, subject: &SubjectId) -> Result<StorySet, FetchError> {
        let path = self.story_path(subject).ok_or_else(|| FetchError::NotFound {
            subject: subject.clone(),
        })?;

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FetchError::NotFound {
                    subject: subject.clone(),
                })
            }
            Err(e) => return Err(FetchError::Io(e)),
        };

        let set = parse_story_file(subject.clone(), &content, &self.defaults, Utc::now())
            .map_err(|e| FetchError::Malformed {
                path: path.clone(),
                reason: format!("{:#}", e),
            })?;

        tracing::debug!(subject = %subject, path = %path.display(), items = set.len(), "loaded story set");
        Ok(set)
    }
}
