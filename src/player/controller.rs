//! Session controller
//!
//! `StoryViewer` is one viewing surface: it owns at most one
//! `ViewerSession`, the advance scheduler and its collaborators (content
//! provider, reaction sink, renderer, clock).
//!
//! Every operation that moves the cursor or ends the session cancels the
//! outstanding timer before touching state, so a timer armed for item k can
//! never advance the session once the cursor has left k. Expiries are also
//! checked against the session id, cursor and token they were armed for.

use std::sync::Arc;

use super::clock::{Clock, Millis};
use super::error::OpenError;
use super::render::{Frame, FrameRenderer};
use super::scheduler::{AdvanceScheduler, SchedulerStats};
use super::state::{
    AdvanceOutcome, CloseReason, Direction, ReactionReceipt, SessionHandle, SessionId,
    SessionStatus, SessionSummary, ViewerSession,
};
use crate::provider::ContentProvider;
use crate::reaction::{ReactionKind, ReactionSink};
use crate::story::SubjectId;

/// Default spacing of progress frames.
pub const DEFAULT_PROGRESS_INTERVAL_MS: Millis = 100;

/// What the advance timer was armed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    pub session: SessionId,
    pub cursor: usize,
}

/// Result of one `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Nothing due
    Idle,
    /// A progress frame was emitted
    Progressed,
    /// The current item expired and the session moved on (or closed)
    Advanced(AdvanceOutcome),
}

/// Story playback engine for one viewing surface.
pub struct StoryViewer<P, S, R, C> {
    provider: P,
    sink: S,
    renderer: R,
    clock: C,
    scheduler: AdvanceScheduler<Expiry>,
    session: Option<ViewerSession>,
    last_session_id: u64,
    progress_interval_ms: Millis,
}

impl<P, S, R, C> StoryViewer<P, S, R, C>
where
    P: ContentProvider,
    S: ReactionSink,
    R: FrameRenderer,
    C: Clock,
{
    pub fn new(provider: P, sink: S, renderer: R, clock: C) -> Self {
        Self {
            provider,
            sink,
            renderer,
            clock,
            scheduler: AdvanceScheduler::new(),
            session: None,
            last_session_id: 0,
            progress_interval_ms: DEFAULT_PROGRESS_INTERVAL_MS,
        }
    }

    /// Set the spacing of progress frames (minimum 1ms).
    pub fn with_progress_interval(mut self, interval_ms: Millis) -> Self {
        self.progress_interval_ms = interval_ms.max(1);
        self
    }

    /// Open a session for `subject`.
    ///
    /// Fetches a fresh story set. On failure nothing changes: no session is
    /// created and a session that is already playing keeps playing. On
    /// success a playing session is replaced, the first item is shown and
    /// its timer armed.
    pub fn open(&mut self, subject: &SubjectId) -> Result<SessionHandle, OpenError> {
        let set = self.provider.fetch_story_set(subject).map_err(|source| {
            tracing::warn!(%subject, error = %source, "story fetch failed");
            OpenError::FetchFailed {
                subject: subject.clone(),
                source,
            }
        })?;

        if set.is_empty() {
            tracing::debug!(%subject, "no stories to show");
            return Err(OpenError::EmptySet {
                subject: subject.clone(),
            });
        }

        self.finish(CloseReason::Replaced);

        self.last_session_id += 1;
        let id = SessionId::new(self.last_session_id);
        let now = self.clock.now_ms();
        let mut session = ViewerSession::new(id, Arc::new(set), now);
        tracing::debug!(session = %id, %subject, items = session.len(), "session loading");

        let handle = SessionHandle {
            id,
            subject: subject.clone(),
            item_count: session.len(),
        };

        session.status = SessionStatus::Playing;
        self.session = Some(session);
        self.enter_item(0, now);

        tracing::debug!(session = %id, "session playing");
        Ok(handle)
    }

    /// Move the cursor manually.
    pub fn advance(&mut self, direction: Direction) -> AdvanceOutcome {
        let now = self.clock.now_ms();
        self.step(direction, now)
    }

    /// Close the current session. Idempotent.
    ///
    /// Returns true if a playing session was closed by this call.
    pub fn close(&mut self) -> bool {
        self.finish(CloseReason::Dismissed)
    }

    /// Close the current session because the host view is going away.
    pub fn interrupt(&mut self) -> bool {
        self.finish(CloseReason::Interrupted)
    }

    /// Forward a reaction to the current item. Never affects playback.
    pub fn react_to(&mut self, kind: ReactionKind) -> ReactionReceipt {
        let Some(session) = self.session.as_ref().filter(|s| s.is_playing()) else {
            return ReactionReceipt::Ignored;
        };
        let Some(item) = session.current_item() else {
            return ReactionReceipt::Ignored;
        };

        match self.sink.record_reaction(session.id, &item.id, kind) {
            Ok(()) => {
                tracing::debug!(session = %session.id, item = %item.id, %kind, "reaction recorded");
                ReactionReceipt::Recorded
            }
            Err(e) => {
                tracing::warn!(session = %session.id, item = %item.id, %kind, error = %e, "reaction not recorded");
                ReactionReceipt::Failed(e)
            }
        }
    }

    /// Pause auto-advance on the current item. Returns true if it paused.
    pub fn pause(&mut self) -> bool {
        let now = self.clock.now_ms();
        let Some(session) = self.session.as_mut().filter(|s| s.is_playing()) else {
            return false;
        };
        if session.is_paused() {
            return false;
        }

        if let Some(token) = session.timer.take() {
            self.scheduler.cancel(token);
        }
        session.clock.pause(now);
        let fraction = session.clock.last_fraction();
        session.last_frame_at = now;
        emit_frame(session, &mut self.renderer, fraction);
        true
    }

    /// Resume a paused item for its remaining time. Returns true if it resumed.
    pub fn resume(&mut self) -> bool {
        let now = self.clock.now_ms();
        let Some(session) = self.session.as_mut().filter(|s| s.is_playing()) else {
            return false;
        };
        if !session.is_paused() {
            return false;
        }
        let Some(duration) = session.current_item().map(|item| item.duration_ms()) else {
            return false;
        };

        let remaining = duration.saturating_sub(session.clock.elapsed(now)).max(1);
        session.clock.resume(now);
        session.timer = Some(self.scheduler.arm(
            now,
            remaining,
            Expiry {
                session: session.id,
                cursor: session.cursor,
            },
        ));
        let fraction = session.clock.last_fraction();
        session.last_frame_at = now;
        emit_frame(session, &mut self.renderer, fraction);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.is_paused() {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Host event-loop entry point.
    ///
    /// Runs an expired advance timer if one is due, otherwise emits a
    /// progress frame when the progress interval has passed.
    pub fn tick(&mut self) -> TickResult {
        let now = self.clock.now_ms();

        if let Some((token, expiry)) = self.scheduler.poll_expired(now) {
            let current = self.session.as_mut().filter(|s| {
                s.is_playing()
                    && s.id == expiry.session
                    && s.cursor == expiry.cursor
                    && s.timer == Some(token)
            });
            match current {
                Some(session) => {
                    session.timer = None;
                    return TickResult::Advanced(self.step(Direction::Next, now));
                }
                None => {
                    tracing::warn!(%token, session = %expiry.session, cursor = expiry.cursor, "ignoring stale advance timer");
                }
            }
        }

        let interval = self.progress_interval_ms;
        let Some(session) = self
            .session
            .as_mut()
            .filter(|s| s.is_playing() && !s.is_paused())
        else {
            return TickResult::Idle;
        };
        if now < session.last_frame_at.saturating_add(interval) {
            return TickResult::Idle;
        }
        let Some(duration) = session.current_item().map(|item| item.duration_ms()) else {
            return TickResult::Idle;
        };

        let fraction = session.clock.fraction(now, duration);
        session.last_frame_at = now;
        emit_frame(session, &mut self.renderer, fraction);
        TickResult::Progressed
    }

    /// Earliest time the host should call `tick` again.
    pub fn next_wakeup(&self) -> Option<Millis> {
        let session = self.session.as_ref().filter(|s| s.is_playing())?;
        let progress = if session.is_paused() {
            None
        } else {
            Some(session.last_frame_at.saturating_add(self.progress_interval_ms))
        };
        match (self.scheduler.next_deadline(), progress) {
            (Some(deadline), Some(progress)) => Some(deadline.min(progress)),
            (deadline, progress) => deadline.or(progress),
        }
    }

    pub fn session(&self) -> Option<&ViewerSession> {
        self.session.as_ref()
    }

    pub fn status(&self) -> Option<SessionStatus> {
        self.session.as_ref().map(ViewerSession::status)
    }

    pub fn is_playing(&self) -> bool {
        self.session.as_ref().is_some_and(ViewerSession::is_playing)
    }

    pub fn is_paused(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.is_playing() && s.is_paused())
    }

    /// Summary of the most recent session once it has closed.
    pub fn last_summary(&self) -> Option<SessionSummary> {
        self.session.as_ref().and_then(ViewerSession::summary)
    }

    pub fn scheduler_stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    pub fn live_timers(&self) -> usize {
        self.scheduler.live_count()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Shared path of manual advance and timer expiry.
    fn step(&mut self, direction: Direction, now: Millis) -> AdvanceOutcome {
        let Some(session) = self.session.as_mut().filter(|s| s.is_playing()) else {
            return AdvanceOutcome::Inactive;
        };

        // Going back from the first item leaves the running timer alone
        if direction == Direction::Previous && session.cursor == 0 {
            return AdvanceOutcome::Unchanged;
        }

        if let Some(token) = session.timer.take() {
            self.scheduler.cancel(token);
        }

        let target = match direction {
            Direction::Next if session.has_next() => session.cursor + 1,
            Direction::Next => {
                self.finish(CloseReason::Exhausted);
                return AdvanceOutcome::Closed;
            }
            Direction::Previous => session.cursor - 1,
        };

        self.enter_item(target, now);
        AdvanceOutcome::Moved { cursor: target }
    }

    /// Show item `cursor` from the start and arm its timer.
    fn enter_item(&mut self, cursor: usize, now: Millis) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.move_to(cursor, now);
        let Some(duration) = session.current_item().map(|item| item.duration_ms()) else {
            return;
        };

        debug_assert!(session.timer.is_none());
        session.timer = Some(self.scheduler.arm(
            now,
            duration,
            Expiry {
                session: session.id,
                cursor,
            },
        ));
        session.last_frame_at = now;
        tracing::debug!(session = %session.id, cursor, duration_ms = duration, "showing item");
        emit_frame(session, &mut self.renderer, 0.0);
    }

    /// Close the session if it is still playing, notifying the renderer once.
    fn finish(&mut self, reason: CloseReason) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.status == SessionStatus::Closed {
            return false;
        }

        if let Some(token) = session.timer.take() {
            self.scheduler.cancel(token);
        }
        session.status = SessionStatus::Closed;
        session.close_reason = Some(reason);
        tracing::debug!(session = %session.id, ?reason, viewed = session.items_viewed(), "session closed");

        if let Some(summary) = session.summary() {
            self.renderer.on_session_closed(&summary);
        }
        true
    }
}

fn emit_frame<R: FrameRenderer>(session: &ViewerSession, renderer: &mut R, fraction: f64) {
    if let Some(item) = session.current_item() {
        renderer.on_frame(&Frame {
            session: session.id,
            subject: session.subject(),
            item,
            position: session.cursor,
            total: session.len(),
            elapsed_fraction: fraction,
            paused: session.is_paused(),
        });
    }
}
