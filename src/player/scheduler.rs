//! Advance scheduler
//!
//! A cooperative single-shot timer. The host loop asks for expired timers
//! with `poll_expired`; nothing runs on its own thread. At most one timer is
//! pending at a time and every token fires or is cancelled at most once.
//!
//! The payload handed to `arm` is returned on expiry and stands in for an
//! "on expire" callback, so the owner decides what expiry means without the
//! scheduler holding a closure over the owner's state.

use std::fmt;

use super::clock::Millis;

/// Handle to one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Lifetime counters, used to check the single-timer invariant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub armed: u64,
    pub cancelled: u64,
    pub fired: u64,
}

impl SchedulerStats {
    /// Timers armed but neither cancelled nor fired.
    pub fn outstanding(&self) -> u64 {
        self.armed - self.cancelled - self.fired
    }
}

#[derive(Debug)]
struct Pending<E> {
    token: TimerToken,
    deadline: Millis,
    payload: E,
}

/// Single-slot cancellable timer.
#[derive(Debug)]
pub struct AdvanceScheduler<E> {
    pending: Option<Pending<E>>,
    next_token: u64,
    stats: SchedulerStats,
}

impl<E> Default for AdvanceScheduler<E> {
    fn default() -> Self {
        Self {
            pending: None,
            next_token: 0,
            stats: SchedulerStats::default(),
        }
    }
}

impl<E> AdvanceScheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to be returned once `delay_ms` after `now`.
    ///
    /// Callers must `cancel` the previous token first. Arming over a live
    /// token panics in debug builds; release builds cancel the old timer.
    pub fn arm(&mut self, now: Millis, delay_ms: Millis, payload: E) -> TimerToken {
        debug_assert!(
            self.pending.is_none(),
            "arm() called while {:?} is still live",
            self.pending.as_ref().map(|p| p.token)
        );
        if let Some(previous) = self.pending.take() {
            tracing::warn!(token = %previous.token, "arming over a live timer, cancelling it");
            self.stats.cancelled += 1;
        }

        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.pending = Some(Pending {
            token,
            deadline: now.saturating_add(delay_ms),
            payload,
        });
        self.stats.armed += 1;
        tracing::trace!(%token, delay_ms, "timer armed");
        token
    }

    /// Cancel `token`. Returns false if it already fired, was already
    /// cancelled, or was never issued.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        match &self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                self.stats.cancelled += 1;
                tracing::trace!(%token, "timer cancelled");
                true
            }
            _ => false,
        }
    }

    /// Take the pending timer if its deadline has passed.
    pub fn poll_expired(&mut self, now: Millis) -> Option<(TimerToken, E)> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => {
                let pending = self.pending.take()?;
                self.stats.fired += 1;
                tracing::trace!(token = %pending.token, "timer fired");
                Some((pending.token, pending.payload))
            }
            _ => None,
        }
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_live(&self, token: TimerToken) -> bool {
        self.pending.as_ref().is_some_and(|p| p.token == token)
    }

    pub fn live_count(&self) -> usize {
        usize::from(self.pending.is_some())
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}
