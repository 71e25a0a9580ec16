//! Viewer session state
//!
//! Contains `ViewerSession`, the runtime state of one viewing of a subject's
//! stories, and the small value types the controller hands to hosts.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::clock::Millis;
use super::scheduler::TimerToken;
use crate::reaction::ReactionError;
use crate::story::{StoryItem, StorySet, SubjectId};

/// Identity of one session, unique per viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Lifecycle of a session. Nothing leaves `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Playing,
    Closed,
}

/// Manual navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// What an `advance` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Cursor moved to the given index
    Moved { cursor: usize },
    /// `Previous` on the first item; nothing changed
    Unchanged,
    /// `Next` past the last item closed the session
    Closed,
    /// No playing session
    Inactive,
}

/// Why a session closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloseReason {
    /// The viewer closed it
    Dismissed,
    /// Played past the last item
    Exhausted,
    /// A new session was opened on the same viewer
    Replaced,
    /// The host tore the view down
    Interrupted,
}

/// Handed to the renderer when a session closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub session: SessionId,
    pub subject: SubjectId,
    pub reason: CloseReason,
    /// Distinct items shown at least once
    pub items_viewed: usize,
    pub total_items: usize,
}

/// Returned from a successful `open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub id: SessionId,
    pub subject: SubjectId,
    pub item_count: usize,
}

/// Result of forwarding a reaction. Never affects playback.
#[derive(Debug)]
pub enum ReactionReceipt {
    Recorded,
    /// The sink failed; reported to the host as a non-fatal notice
    Failed(ReactionError),
    /// No playing session to react to
    Ignored,
}

/// Display clock of the current item.
///
/// Elapsed time is banked on pause so the fraction picks up where it left
/// off on resume. `last_fraction` keeps reported progress from going
/// backwards within one item.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ItemClock {
    started_at: Millis,
    banked_ms: Millis,
    paused: bool,
    last_fraction: f64,
}

impl ItemClock {
    pub(crate) fn start(now: Millis) -> Self {
        Self {
            started_at: now,
            banked_ms: 0,
            paused: false,
            last_fraction: 0.0,
        }
    }

    pub(crate) fn elapsed(&self, now: Millis) -> Millis {
        if self.paused {
            self.banked_ms
        } else {
            self.banked_ms + now.saturating_sub(self.started_at)
        }
    }

    pub(crate) fn pause(&mut self, now: Millis) {
        if !self.paused {
            self.banked_ms = self.elapsed(now);
            self.paused = true;
        }
    }

    pub(crate) fn resume(&mut self, now: Millis) {
        if self.paused {
            self.started_at = now;
            self.paused = false;
        }
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused
    }

    /// Elapsed fraction of `duration_ms`, clamped to [0, 1], never decreasing.
    pub(crate) fn fraction(&mut self, now: Millis, duration_ms: Millis) -> f64 {
        let raw = if duration_ms == 0 {
            1.0
        } else {
            (self.elapsed(now) as f64 / duration_ms as f64).clamp(0.0, 1.0)
        };
        self.last_fraction = self.last_fraction.max(raw);
        self.last_fraction
    }

    pub(crate) fn last_fraction(&self) -> f64 {
        self.last_fraction
    }
}

/// Runtime state of one viewing session.
///
/// Owned by the controller. The story set is shared read-only; `cursor` is
/// always a valid index into it.
#[derive(Debug)]
pub struct ViewerSession {
    pub(crate) id: SessionId,
    pub(crate) story_set: Arc<StorySet>,
    pub(crate) cursor: usize,
    pub(crate) timer: Option<TimerToken>,
    pub(crate) status: SessionStatus,
    pub(crate) clock: ItemClock,
    pub(crate) furthest: usize,
    pub(crate) opened_at: Millis,
    pub(crate) last_frame_at: Millis,
    pub(crate) close_reason: Option<CloseReason>,
}

impl ViewerSession {
    /// New session in `Loading`, cursor on the first item.
    pub(crate) fn new(id: SessionId, story_set: Arc<StorySet>, now: Millis) -> Self {
        Self {
            id,
            story_set,
            cursor: 0,
            timer: None,
            status: SessionStatus::Loading,
            clock: ItemClock::start(now),
            furthest: 0,
            opened_at: now,
            last_frame_at: now,
            close_reason: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn subject(&self) -> &SubjectId {
        self.story_set.subject()
    }

    pub fn story_set(&self) -> &Arc<StorySet> {
        &self.story_set
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn timer(&self) -> Option<TimerToken> {
        self.timer
    }

    pub fn is_playing(&self) -> bool {
        self.status == SessionStatus::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn opened_at(&self) -> Millis {
        self.opened_at
    }

    pub fn len(&self) -> usize {
        self.story_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.story_set.is_empty()
    }

    /// Item under the cursor.
    pub fn current_item(&self) -> Option<&StoryItem> {
        self.story_set.get(self.cursor)
    }

    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.story_set.len()
    }

    /// Distinct items shown so far (items are shown in order, so this is
    /// one past the furthest cursor reached).
    pub fn items_viewed(&self) -> usize {
        self.furthest + 1
    }

    pub fn close_reason(&self) -> Option<CloseReason> {
        self.close_reason
    }

    /// Summary of a closed session; `None` while it is still open.
    pub fn summary(&self) -> Option<SessionSummary> {
        self.close_reason.map(|reason| SessionSummary {
            session: self.id,
            subject: self.subject().clone(),
            reason,
            items_viewed: self.items_viewed(),
            total_items: self.len(),
        })
    }

    pub(crate) fn move_to(&mut self, cursor: usize, now: Millis) {
        self.cursor = cursor;
        self.furthest = self.furthest.max(cursor);
        self.clock = ItemClock::start(now);
    }
}
