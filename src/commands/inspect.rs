//! Inspect command: list a subject's stories without playing them.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};

use storyplay::player::render::{format_age, format_duration, truncate_to_width};
use storyplay::provider::ContentProvider;
use storyplay::story::StorySet;
use storyplay::Config;

use super::{directory_provider, parse_subject};

const PAYLOAD_WIDTH: usize = 48;

#[cfg(not(tarpaulin_include))]
pub fn handle(subject: String, dir: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let provider = directory_provider(&config, dir)?;
    let subject = parse_subject(subject)?;

    let set = provider
        .fetch_story_set(&subject)
        .with_context(|| format!("Failed to fetch stories for '{}'", subject))?;
    if set.is_empty() {
        bail!("'{}' has no stories", subject);
    }

    print!("{}", describe(&set, Utc::now()));
    Ok(())
}

/// One header line plus one line per item.
pub fn describe(set: &StorySet, now: DateTime<Utc>) -> String {
    let mut out = format!(
        "{}: {} item{}, {} total\n",
        set.subject(),
        set.len(),
        if set.len() == 1 { "" } else { "s" },
        format_duration(set.total_duration_ms())
    );
    for (i, item) in set.items().iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<12} {:<5} {} {:>10}  {}\n",
            i + 1,
            item.id.as_str(),
            item.kind().label(),
            format_duration(item.duration_ms()),
            format_age(item.created_at, now),
            truncate_to_width(item.content.payload(), PAYLOAD_WIDTH)
        ));
    }
    out
}
