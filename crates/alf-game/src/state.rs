//! The simulated world: root game state and the player sub-aggregate.
//!
//! All mutable fields are [`Observable`] cells, so every change is versioned
//! and observable. Cells are written through `&self`, so aggregates are
//! shared with plain `Rc` handles: the handlers that own the player are
//! constructed and registered separately from the root state, and observers
//! may read any part of the state while a write is being notified.

use alf_core::hash::StateHash;
use alf_core::observable::Observable;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Plain values of every hashed field, without observers or versions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSnapshot {
    pub global_time: f32,
    pub health: f32,
    pub position_x: f32,
    pub position_y: f32,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            global_time: 0.0,
            health: PlayerState::STARTING_HEALTH,
            position_x: 0.0,
            position_y: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerState
// ---------------------------------------------------------------------------

/// Runtime state of the player.
#[derive(Debug)]
pub struct PlayerState {
    /// Never negative once a handler has run.
    pub health: Observable<f32>,
    pub position_x: Observable<f32>,
    pub position_y: Observable<f32>,
}

impl PlayerState {
    pub const STARTING_HEALTH: f32 = 100.0;

    pub fn new() -> Self {
        Self::with_values(Self::STARTING_HEALTH, 0.0, 0.0)
    }

    pub fn with_values(health: f32, position_x: f32, position_y: f32) -> Self {
        Self {
            health: Observable::new(health),
            position_x: Observable::new(position_x),
            position_y: Observable::new(position_y),
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// Root aggregate of the simulation. Constructed once per run.
#[derive(Debug)]
pub struct GameState {
    /// Simulated seconds elapsed, advanced once per tick.
    pub global_time: Observable<f32>,
    pub player: Rc<PlayerState>,
}

impl GameState {
    pub fn new() -> Self {
        Self::from_snapshot(&StateSnapshot::default())
    }

    /// Build a fresh state holding the snapshot's values at version 0.
    pub fn from_snapshot(snapshot: &StateSnapshot) -> Self {
        Self {
            global_time: Observable::new(snapshot.global_time),
            player: Rc::new(PlayerState::with_values(
                snapshot.health,
                snapshot.position_x,
                snapshot.position_y,
            )),
        }
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let player = &self.player;
        StateSnapshot {
            global_time: self.global_time.get(),
            health: player.health.get(),
            position_x: player.position_x.get(),
            position_y: player.position_y.get(),
        }
    }

    /// Deterministic digest of the current field values.
    ///
    /// Fields are folded in the order global time, health, x, y. Versions
    /// and observers do not contribute.
    pub fn deterministic_hash(&self) -> u32 {
        let player = &self.player;
        let mut hasher = StateHash::new();
        hasher.write_f32(self.global_time.get());
        hasher.write_f32(player.health.get());
        hasher.write_f32(player.position_x.get());
        hasher.write_f32(player.position_y.get());
        hasher.finish()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
