//! Line-oriented renderer for non-interactive output.

use std::io::Write;

use super::{Frame, FrameRenderer};
use crate::player::state::{CloseReason, SessionId, SessionSummary};

/// Prints one line per item shown and one when the session closes.
///
/// Progress frames are ignored; only cursor changes produce output.
#[derive(Debug)]
pub struct PlainRenderer<W: Write> {
    out: W,
    last_shown: Option<(SessionId, usize)>,
}

impl<W: Write> PlainRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_shown: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "failed to write frame");
        }
    }
}

impl<W: Write> FrameRenderer for PlainRenderer<W> {
    fn on_frame(&mut self, frame: &Frame<'_>) {
        let key = (frame.session, frame.position);
        if self.last_shown == Some(key) {
            return;
        }
        self.last_shown = Some(key);

        let line = format!(
            "[{}/{}] {} {} ({}ms) {}",
            frame.position + 1,
            frame.total,
            frame.subject,
            frame.item.kind().label(),
            frame.item.duration_ms(),
            frame.item.content.payload()
        );
        self.write_line(&line);
    }

    fn on_session_closed(&mut self, summary: &SessionSummary) {
        let reason = match summary.reason {
            CloseReason::Dismissed => "closed",
            CloseReason::Exhausted => "finished",
            CloseReason::Replaced => "replaced",
            CloseReason::Interrupted => "interrupted",
        };
        let line = format!(
            "{} {}: viewed {} of {}",
            summary.subject, reason, summary.items_viewed, summary.total_items
        );
        self.write_line(&line);
    }
}
