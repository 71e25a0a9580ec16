//! Story data model
//!
//! A `StorySet` is the ordered list of `StoryItem`s one subject has posted.
//! Items carry their content as a tagged variant, so every consumer has to
//! handle all three kinds explicitly.
//!
//! The on-disk JSON format lives in [`file`].

pub mod file;

use std::collections::HashSet;
use std::fmt;
use std::num::NonZeroU64;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use file::{parse_story_file, DurationDefaults};

/// Errors raised while building story values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoryError {
    #[error("Duplicate story item id '{0}'")]
    DuplicateItemId(ItemId),

    #[error("Invalid subject id: {0:?}")]
    InvalidSubject(String),
}

/// Owner of a story set (a user).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    /// Create a subject id, rejecting blank input.
    pub fn new(id: impl Into<String>) -> Result<Self, StoryError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(StoryError::InvalidSubject(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque item identifier, unique within its `StorySet`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind discriminant of a story item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryKind {
    Image,
    Text,
    Video,
}

impl StoryKind {
    /// Short label for display/logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Text => "text",
            Self::Video => "video",
        }
    }
}

/// Kind-specific payload of a story item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoryContent {
    /// Still image shown for the item's duration
    Image { url: String },
    /// Text card
    Text { body: String },
    /// Video clip, referenced by stream location
    Video { stream: String },
}

impl StoryContent {
    pub fn kind(&self) -> StoryKind {
        match self {
            Self::Image { .. } => StoryKind::Image,
            Self::Text { .. } => StoryKind::Text,
            Self::Video { .. } => StoryKind::Video,
        }
    }

    /// The URL, text body or stream reference, whichever this item carries.
    pub fn payload(&self) -> &str {
        match self {
            Self::Image { url } => url,
            Self::Text { body } => body,
            Self::Video { stream } => stream,
        }
    }
}

/// One piece of ephemeral content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryItem {
    pub id: ItemId,
    pub content: StoryContent,
    /// Display time in milliseconds before auto-advance
    pub duration: NonZeroU64,
    pub created_at: DateTime<Utc>,
}

impl StoryItem {
    pub fn new(
        id: impl Into<String>,
        content: StoryContent,
        duration: NonZeroU64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ItemId::new(id),
            content,
            duration,
            created_at,
        }
    }

    pub fn kind(&self) -> StoryKind {
        self.content.kind()
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration.get()
    }
}

/// All items belonging to one subject, in playback order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorySet {
    subject: SubjectId,
    items: Vec<StoryItem>,
}

impl StorySet {
    /// Build a story set, checking that item ids are unique.
    pub fn new(subject: SubjectId, items: Vec<StoryItem>) -> Result<Self, StoryError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(&item.id) {
                return Err(StoryError::DuplicateItemId(item.id.clone()));
            }
        }
        Ok(Self { subject, items })
    }

    pub fn subject(&self) -> &SubjectId {
        &self.subject
    }

    pub fn items(&self) -> &[StoryItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&StoryItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all item durations in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.items.iter().map(StoryItem::duration_ms).sum()
    }
}
