//! Frame rendering for the story player.
//!
//! The engine paints nothing itself. It calls a `FrameRenderer` whenever
//! the item on screen or its progress changes, and once when the session
//! closes. This module holds that contract plus two renderers for terminals:
//! an ANSI full-screen one and a plain line-per-item one for pipes.

mod plain;
mod progress;
mod terminal;

pub use plain::PlainRenderer;
pub use progress::{build_segment_bar, format_age, format_duration, render_segment_bar, BarCell};
pub use terminal::{truncate_to_width, TerminalRenderer};

use crate::player::state::{SessionId, SessionSummary};
use crate::story::{StoryItem, SubjectId};

/// One paint request.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub session: SessionId,
    pub subject: &'a SubjectId,
    pub item: &'a StoryItem,
    /// Index of `item` in the story set
    pub position: usize,
    pub total: usize,
    /// 0.0 when the item appears; never decreases while it stays on screen
    pub elapsed_fraction: f64,
    pub paused: bool,
}

impl Frame<'_> {
    /// True for the first frame of an item.
    pub fn is_item_start(&self) -> bool {
        self.elapsed_fraction == 0.0
    }
}

/// Host-side view of a playing session.
pub trait FrameRenderer {
    /// Paint `frame.item` and the progress indicator.
    fn on_frame(&mut self, frame: &Frame<'_>);

    /// The session closed; called exactly once per session.
    fn on_session_closed(&mut self, summary: &SessionSummary);
}

impl<T: FrameRenderer + ?Sized> FrameRenderer for Box<T> {
    fn on_frame(&mut self, frame: &Frame<'_>) {
        (**self).on_frame(frame)
    }

    fn on_session_closed(&mut self, summary: &SessionSummary) {
        (**self).on_session_closed(summary)
    }
}
