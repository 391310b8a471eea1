//! ALF Game -- a small deterministic game built on `alf-core`.
//!
//! The world is one global clock and one player with health and a 2D
//! position. Player mutations arrive as typed commands, are queued until the
//! next tick boundary, and are applied by handlers bound to the player.
//!
//! # Wiring
//!
//! [`simulation::Simulation`] is the composition root. It builds the state,
//! registers every handler once, and subscribes two systems to the tick
//! engine: the command pump first, then time advance. The embedding driver
//! only calls `submit` and `advance`:
//!
//! ```rust,ignore
//! let mut sim = Simulation::new(&SimConfig::default())?;
//! sim.submit(MoveCommand::new(1.5, -0.5));
//! sim.advance(frame_delta)?;
//! let hash = sim.state_hash();
//! ```
//!
//! # Key Types
//!
//! - [`state::GameState`] / [`state::PlayerState`] -- Observable world state.
//! - [`commands::GameCommand`] -- Move, damage and heal commands.
//! - [`handlers`] -- One handler per command, bound to the player.
//! - [`simulation::Simulation`] -- Composition root and driver surface.
//! - [`store::GameStateStore`] -- Load/save boundary for checkpoints.
//! - [`config::SimConfig`] -- Run parameters from RON, TOML or JSON.
//! - [`replay::ReplayLog`] -- Recorded runs with hash checkpoints.

pub mod commands;
pub mod config;
pub mod handlers;
pub mod replay;
pub mod simulation;
pub mod state;
pub mod store;
pub mod systems;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
