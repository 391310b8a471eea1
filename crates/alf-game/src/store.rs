//! Persistence boundary for the game state.
//!
//! The simulation only talks to a [`GameStateStore`] at start-up and at
//! explicit checkpoints, never in the middle of a tick. Durable storage is
//! the embedding application's concern; [`InMemoryGameStateStore`] is the
//! reference implementation used by tests and headless runs.

use crate::state::{GameState, StateSnapshot};

/// Load/save contract for the game state.
pub trait GameStateStore {
    /// Produce the state to start (or resume) a simulation from.
    fn load(&self) -> GameState;

    /// Record `state` as the latest checkpoint.
    fn save(&mut self, state: &GameState);
}

/// Keeps the last saved snapshot in memory.
///
/// Only field values are kept; observers and versions start fresh on load.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGameStateStore {
    saved: Option<StateSnapshot>,
}

impl InMemoryGameStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last saved snapshot, if any.
    pub fn saved(&self) -> Option<&StateSnapshot> {
        self.saved.as_ref()
    }
}

impl GameStateStore for InMemoryGameStateStore {
    fn load(&self) -> GameState {
        match &self.saved {
            Some(snapshot) => GameState::from_snapshot(snapshot),
            None => GameState::new(),
        }
    }

    fn save(&mut self, state: &GameState) {
        self.saved = Some(state.snapshot());
    }
}
