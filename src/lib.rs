//! storyplay - story playback engine
//!
//! Plays a subject's ephemeral story items in order, auto-advancing each
//! after its display duration, with manual navigation, pause and reactions.
//!
//! The engine ([`player::StoryViewer`]) is independent of where stories come
//! from ([`provider`]), where reactions go ([`reaction`]) and how frames are
//! drawn ([`player::FrameRenderer`]).

pub mod cli;
pub mod config;
pub mod files;
pub mod player;
pub mod provider;
pub mod reaction;
pub mod story;

pub use config::Config;
pub use player::{OpenError, StoryViewer};
