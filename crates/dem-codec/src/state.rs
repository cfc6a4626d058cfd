//! Session context threaded through a decode or encode pass.

use dem_core::{GameData, GameType};

use crate::options::WireLayout;
use crate::types::Event;

/// Everything an event or object codec routine may consult.
#[derive(Clone, Copy)]
pub struct CodecContext<'a> {
    /// Session state as of the event being coded.
    pub state: StreamState,
    /// Static game-data lookups.
    pub game_data: &'a dyn GameData,
    /// Wire layout in use.
    pub layout: WireLayout,
}

impl<'a> CodecContext<'a> {
    /// Bundle a state snapshot with the pass-wide settings.
    pub fn new(state: StreamState, game_data: &'a dyn GameData, layout: WireLayout) -> Self {
        Self {
            state,
            game_data,
            layout,
        }
    }

    /// Game type of the current session.
    pub fn game_type(&self) -> GameType {
        self.state.game_type
    }
}

/// Mutable session context for one pass over a stream.
///
/// Starts unset. Only two events change it: a session start establishes
/// edition and game type and raises `just_started_playback`; a level
/// change in a second-edition session lowers the flag again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamState {
    /// Edition byte of the current session.
    pub edition: u8,
    /// Game type of the current session.
    pub game_type: GameType,
    /// Set by a session start, cleared by the next second-edition level
    /// change.
    pub just_started_playback: bool,
}

impl StreamState {
    /// A fresh, unset state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one decoded or written event into the state.
    pub fn observe(&mut self, event: &Event) {
        match event {
            Event::StartDemo(start) => {
                self.edition = start.edition;
                self.game_type = start.game_type;
                self.just_started_playback = true;
            }
            Event::NewLevel { .. } if self.game_type.is_second_edition() => {
                self.just_started_playback = false;
            }
            _ => {}
        }
    }

    /// Whether a second-edition level change carries a wall snapshot.
    pub fn expects_wall_snapshot(&self) -> bool {
        self.game_type.is_second_edition() && self.just_started_playback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_level() -> Event {
        Event::NewLevel {
            new_level: 2,
            old_level: 1,
            walls: None,
        }
    }

    #[test]
    fn new_level_only_clears_under_second_edition() {
        let mut state = StreamState {
            edition: 1,
            game_type: GameType::FULL,
            just_started_playback: true,
        };
        state.observe(&new_level());
        assert!(state.just_started_playback);

        state.game_type = GameType::SECOND_EDITION;
        assert!(state.expects_wall_snapshot());
        state.observe(&new_level());
        assert!(!state.just_started_playback);
        assert!(!state.expects_wall_snapshot());
    }

    #[test]
    fn other_events_leave_state_alone() {
        let mut state = StreamState::new();
        state.observe(&Event::Letterbox);
        state.observe(&Event::PlayerScore { score: 9 });
        assert_eq!(state, StreamState::new());
    }
}
