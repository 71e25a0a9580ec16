//! Story playback engine
//!
//! Plays a subject's story items in order, auto-advancing each one after
//! its display duration and letting the viewer step, pause, react or close.
//!
//! # Architecture
//!
//! - `controller`: `StoryViewer`, the session controller and public entry point
//! - `scheduler`: the single cancellable auto-advance timer
//! - `state`: `ViewerSession` and the value types handed to hosts
//! - `render/`: the `FrameRenderer` contract plus terminal and plain renderers
//! - `input/`: key bindings for the interactive host
//! - `host`: event loops that drive a viewer from a terminal
//! - `clock`: time sources
//!
//! # Usage
//!
//! ```no_run
//! use storyplay::player::{play_plain, PlainRenderer, StoryViewer, SystemClock};
//! use storyplay::provider::DirectoryProvider;
//! use storyplay::reaction::NullReactionSink;
//! use storyplay::story::{DurationDefaults, SubjectId};
//!
//! let provider = DirectoryProvider::new("stories", DurationDefaults::default());
//! let renderer = PlainRenderer::new(std::io::stdout());
//! let mut viewer = StoryViewer::new(provider, NullReactionSink, renderer, SystemClock::new());
//!
//! let subject = SubjectId::new("alice").unwrap();
//! let summary = play_plain(&mut viewer, &subject).unwrap();
//! println!("viewed {} of {}", summary.items_viewed, summary.total_items);
//! ```

pub mod clock;
mod controller;
mod error;
mod host;
pub(crate) mod input;
pub mod render;
pub mod scheduler;
pub mod state;

pub use clock::{Clock, ManualClock, Millis, SystemClock};
pub use controller::{Expiry, StoryViewer, TickResult, DEFAULT_PROGRESS_INTERVAL_MS};
pub use error::OpenError;
pub use host::{play_interactive, play_plain, run_until_closed};
pub use input::{InputResult, PlayerCommand};
pub use render::{Frame, FrameRenderer, PlainRenderer, TerminalRenderer};
pub use scheduler::{AdvanceScheduler, SchedulerStats, TimerToken};
pub use state::{
    AdvanceOutcome, CloseReason, Direction, ReactionReceipt, SessionHandle, SessionId,
    SessionStatus, SessionSummary, ViewerSession,
};
