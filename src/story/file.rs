//! Story file parser
//!
//! A story file holds one subject's items as JSON, either as a bare array or
//! wrapped in an object under `items`:
//!
//! ```json
//! [
//!   { "id": "a1", "kind": "image", "url": "https://cdn/a1.jpg", "duration_ms": 500 },
//!   { "id": "a2", "kind": "text", "body": "hello", "created_at": "2026-10-01T10:00:00Z" }
//! ]
//! ```
//!
//! `duration_ms` falls back to the per-kind default; `created_at` falls back
//! to the load time.

use std::num::NonZeroU64;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::{StoryContent, StoryItem, StoryKind, StorySet, SubjectId};

/// Display durations applied when an item does not specify one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationDefaults {
    pub image: NonZeroU64,
    pub text: NonZeroU64,
    pub video: NonZeroU64,
}

impl DurationDefaults {
    pub fn for_kind(&self, kind: StoryKind) -> NonZeroU64 {
        match kind {
            StoryKind::Image => self.image,
            StoryKind::Text => self.text,
            StoryKind::Video => self.video,
        }
    }
}

impl Default for DurationDefaults {
    fn default() -> Self {
        Self {
            image: NonZeroU64::new(5_000).unwrap_or(NonZeroU64::MIN),
            text: NonZeroU64::new(5_000).unwrap_or(NonZeroU64::MIN),
            video: NonZeroU64::new(15_000).unwrap_or(NonZeroU64::MIN),
        }
    }
}

/// Item as written in a story file.
#[derive(Debug, Deserialize)]
struct RawItem {
    id: String,
    #[serde(flatten)]
    content: StoryContent,
    #[serde(default)]
    duration_ms: Option<NonZeroU64>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// Parse the contents of a story file into a `StorySet` for `subject`.
///
/// # Arguments
/// * `subject` - Owner of the stories
/// * `content` - Raw JSON text
/// * `defaults` - Durations for items without `duration_ms`
/// * `loaded_at` - Timestamp used for items without `created_at`
pub fn parse_story_file(
    subject: SubjectId,
    content: &str,
    defaults: &DurationDefaults,
    loaded_at: DateTime<Utc>,
) -> Result<StorySet> {
    let value: Value = serde_json::from_str(content).context("Story file is not valid JSON")?;

    let items_value = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove("items") {
            Some(items) => items,
            None => bail!("Story file object has no 'items' field"),
        },
        _ => bail!("Story file must be a JSON array or an object with 'items'"),
    };

    let raw: Vec<RawItem> =
        serde_json::from_value(items_value).context("Invalid story item")?;

    let items = raw
        .into_iter()
        .map(|r| {
            let duration = r
                .duration_ms
                .unwrap_or_else(|| defaults.for_kind(r.content.kind()));
            StoryItem::new(r.id, r.content, duration, r.created_at.unwrap_or(loaded_at))
        })
        .collect();

    Ok(StorySet::new(subject, items)?)
}
