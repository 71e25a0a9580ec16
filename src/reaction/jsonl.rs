//! Append-only JSON Lines reaction log.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ReactionError, ReactionKind, ReactionSink};
use crate::player::SessionId;
use crate::story::ItemId;

/// One line of the reaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRecord {
    pub session: SessionId,
    pub item: ItemId,
    pub reaction: ReactionKind,
    pub recorded_at: DateTime<Utc>,
}

/// Appends each reaction as one JSON object per line.
///
/// The file is opened per reaction, so nothing is held open between calls.
#[derive(Debug, Clone)]
pub struct JsonlReactionSink {
    path: PathBuf,
}

impl JsonlReactionSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all records back, skipping lines that do not parse.
    pub fn read_records(&self) -> Result<Vec<ReactionRecord>, ReactionError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(content
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }
}

impl ReactionSink for JsonlReactionSink {
    fn record_reaction(
        &self,
        session: SessionId,
        item: &ItemId,
        kind: ReactionKind,
    ) -> Result<(), ReactionError> {
        let record = ReactionRecord {
            session,
            item: item.clone(),
            reaction: kind,
            recorded_at: Utc::now(),
        };
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}
