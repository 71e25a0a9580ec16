//! Time sources for the playback engine.
//!
//! The engine reads time only through `Clock`, in milliseconds since an
//! arbitrary origin. Hosts use `SystemClock`; tests drive a `ManualClock`.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Milliseconds on the engine's monotonic timeline.
pub type Millis = u64;

pub trait Clock {
    fn now_ms(&self) -> Millis;
}

/// Monotonic wall clock starting at zero when created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now: Millis) {
        self.now.set(now);
    }

    /// Move time forward by `ms`.
    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}
