//! Reactions to story items
//!
//! Reactions are a side channel: the engine forwards them to a
//! `ReactionSink` and never lets the outcome touch playback.

mod jsonl;

pub use jsonl::JsonlReactionSink;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::player::SessionId;
use crate::story::ItemId;

/// Reaction a viewer can send to the item on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Heart,
    Laugh,
    Wow,
    Sad,
    Fire,
    Clap,
}

impl ReactionKind {
    /// All reactions, in the order the host offers them.
    pub const ALL: [ReactionKind; 6] = [
        Self::Heart,
        Self::Laugh,
        Self::Wow,
        Self::Sad,
        Self::Fire,
        Self::Clap,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Heart => "heart",
            Self::Laugh => "laugh",
            Self::Wow => "wow",
            Self::Sad => "sad",
            Self::Fire => "fire",
            Self::Clap => "clap",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Heart => "❤️",
            Self::Laugh => "😂",
            Self::Wow => "😮",
            Self::Sad => "😢",
            Self::Fire => "🔥",
            Self::Clap => "👏",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from recording a reaction.
#[derive(Debug, thiserror::Error)]
pub enum ReactionError {
    #[error("Failed to write reaction: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode reaction: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Reaction rejected: {0}")]
    Rejected(String),
}

/// Destination for reactions. Best effort; callers ignore failures.
pub trait ReactionSink {
    fn record_reaction(
        &self,
        session: SessionId,
        item: &ItemId,
        kind: ReactionKind,
    ) -> Result<(), ReactionError>;
}

impl<T: ReactionSink + ?Sized> ReactionSink for &T {
    fn record_reaction(
        &self,
        session: SessionId,
        item: &ItemId,
        kind: ReactionKind,
    ) -> Result<(), ReactionError> {
        (**self).record_reaction(session, item, kind)
    }
}

impl<T: ReactionSink + ?Sized> ReactionSink for Box<T> {
    fn record_reaction(
        &self,
        session: SessionId,
        item: &ItemId,
        kind: ReactionKind,
    ) -> Result<(), ReactionError> {
        (**self).record_reaction(session, item, kind)
    }
}

/// Sink that drops every reaction.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReactionSink;

impl ReactionSink for NullReactionSink {
    fn record_reaction(
        &self,
        _session: SessionId,
        _item: &ItemId,
        _kind: ReactionKind,
    ) -> Result<(), ReactionError> {
        Ok(())
    }
}
