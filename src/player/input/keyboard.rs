//! Keyboard bindings for the interactive player.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::PlayerCommand;
use crate::player::state::Direction;
use crate::reaction::ReactionKind;

/// Map a key press to a player command.
///
/// Key releases and repeats are ignored so one press is one command.
pub fn map_key(key: &KeyEvent) -> Option<PlayerCommand> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        // === Close ===
        KeyCode::Char('q') | KeyCode::Esc => Some(PlayerCommand::Close),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(PlayerCommand::Close)
        }

        // === Navigation ===
        KeyCode::Right | KeyCode::Char('n') | KeyCode::Char('l') => {
            Some(PlayerCommand::Advance(Direction::Next))
        }
        KeyCode::Left | KeyCode::Char('p') | KeyCode::Char('h') => {
            Some(PlayerCommand::Advance(Direction::Previous))
        }

        // === Playback ===
        KeyCode::Char(' ') => Some(PlayerCommand::TogglePause),

        // === Reactions (1-6) ===
        KeyCode::Char(c @ '1'..='6') => {
            let index = c as usize - '1' as usize;
            ReactionKind::ALL.get(index).copied().map(PlayerCommand::React)
        }

        _ => None,
    }
}
