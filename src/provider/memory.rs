//! In-memory content provider.

use std::collections::HashMap;

use super::{ContentProvider, FetchError};
use crate::story::{StorySet, SubjectId};

/// Serves story sets from a map.
///
/// A subject can also be marked unavailable, which makes every fetch for it
/// fail with `FetchError::Unavailable`.
#[derive(Debug, Default, Clone)]
pub struct MemoryProvider {
    sets: HashMap<SubjectId, StorySet>,
    unavailable: HashMap<SubjectId, String>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the set for its subject.
    pub fn insert(&mut self, set: StorySet) {
        self.sets.insert(set.subject().clone(), set);
    }

    /// Builder-style `insert`.
    pub fn with_set(mut self, set: StorySet) -> Self {
        self.insert(set);
        self
    }

    /// Make fetches for `subject` fail with `message`.
    pub fn fail_subject(&mut self, subject: SubjectId, message: impl Into<String>) {
        self.unavailable.insert(subject, message.into());
    }
}

impl ContentProvider for MemoryProvider {
    fn fetch_story_set(&self, subject: &SubjectId) -> Result<StorySet, FetchError> {
        if let Some(message) = self.unavailable.get(subject) {
            return Err(FetchError::Unavailable(message.clone()));
        }
        self.sets
            .get(subject)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                subject: subject.clone(),
            })
    }
}
