//! Input handling for the interactive player.
//!
//! Key presses are mapped to `PlayerCommand`s first, then applied to the
//! viewer. Keeping the mapping pure lets it be tested without a terminal.

mod keyboard;

pub use keyboard::map_key;

use crossterm::event::Event;

use crate::player::clock::Clock;
use crate::player::controller::StoryViewer;
use crate::player::render::FrameRenderer;
use crate::player::state::{Direction, ReactionReceipt};
use crate::provider::ContentProvider;
use crate::reaction::{ReactionKind, ReactionSink};

/// Control flow signal returned by input handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    /// Session closed by the viewer; leave the loop
    Quit,
    /// Reaction outcome to surface as a notice
    Notice(String),
}

/// What a key press asks the player to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Advance(Direction),
    TogglePause,
    React(ReactionKind),
    Close,
}

/// Apply a command to the viewer.
pub fn apply_command<P, S, R, C>(
    command: PlayerCommand,
    viewer: &mut StoryViewer<P, S, R, C>,
) -> InputResult
where
    P: ContentProvider,
    S: ReactionSink,
    R: FrameRenderer,
    C: Clock,
{
    match command {
        PlayerCommand::Advance(direction) => {
            viewer.advance(direction);
        }
        PlayerCommand::TogglePause => {
            viewer.toggle_pause();
        }
        PlayerCommand::React(kind) => {
            return match viewer.react_to(kind) {
                ReactionReceipt::Recorded => InputResult::Notice(format!("sent {}", kind.emoji())),
                ReactionReceipt::Failed(e) => {
                    InputResult::Notice(format!("reaction not sent: {}", e))
                }
                ReactionReceipt::Ignored => InputResult::Continue,
            };
        }
        PlayerCommand::Close => {
            viewer.close();
            return InputResult::Quit;
        }
    }

    if viewer.is_playing() {
        InputResult::Continue
    } else {
        InputResult::Quit
    }
}

/// Handle a key event. Other events are left to the host.
pub fn handle_event<P, S, R, C>(event: &Event, viewer: &mut StoryViewer<P, S, R, C>) -> InputResult
where
    P: ContentProvider,
    S: ReactionSink,
    R: FrameRenderer,
    C: Clock,
{
    match event {
        Event::Key(key) => match map_key(key) {
            Some(command) => apply_command(command, viewer),
            None => InputResult::Continue,
        },
        _ => InputResult::Continue,
    }
}
