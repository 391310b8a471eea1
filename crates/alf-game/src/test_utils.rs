//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::commands::{GameCommand, HealCommand, MoveCommand, TakeDamageCommand};
use crate::config::SimConfig;
use crate::replay::{Recorder, ReplayLog};
use crate::simulation::Simulation;
use alf_core::error::SimError;
use alf_core::tick::TickContext;

// ===========================================================================
// Command constructors
// ===========================================================================

pub fn move_by(delta_x: f32, delta_y: f32) -> GameCommand {
    GameCommand::Move(MoveCommand::new(delta_x, delta_y))
}

pub fn damage(amount: f32) -> GameCommand {
    GameCommand::TakeDamage(TakeDamageCommand::new(amount))
}

pub fn heal(amount: f32) -> GameCommand {
    GameCommand::Heal(HealCommand::new(amount))
}

// ===========================================================================
// Simulation helpers
// ===========================================================================

/// A default-state simulation with the given fixed step.
pub fn make_sim(fixed_delta_time: f32) -> Simulation {
    match Simulation::new(&SimConfig::with_fixed_delta_time(fixed_delta_time)) {
        Ok(sim) => sim,
        Err(err) => panic!("test simulation with step {fixed_delta_time}: {err}"),
    }
}

/// Dispatch `commands` in order, all within the tick `tick_index`.
pub fn dispatch_all(
    sim: &mut Simulation,
    commands: &[GameCommand],
    tick_index: u64,
) -> Result<(), SimError> {
    let ctx = TickContext::new(sim.fixed_delta_time(), tick_index);
    for command in commands {
        sim.dispatch_now(command.as_command(), ctx)?;
    }
    Ok(())
}

pub fn health(sim: &Simulation) -> f32 {
    sim.snapshot().health
}

pub fn position(sim: &Simulation) -> (f32, f32) {
    let snapshot = sim.snapshot();
    (snapshot.position_x, snapshot.position_y)
}

/// Submit `commands[i]` then advance by `deltas[i]`, pairwise, while
/// recording. Extra commands or deltas past the shorter slice are applied
/// at the end in the same alternating order.
pub fn record_interleaved(
    config: &SimConfig,
    commands: &[GameCommand],
    deltas: &[f32],
) -> Result<(Simulation, ReplayLog), SimError> {
    let mut rec = Recorder::new(config)?;
    let steps = commands.len().max(deltas.len());
    for i in 0..steps {
        if let Some(command) = commands.get(i) {
            rec.submit(*command);
        }
        if let Some(delta) = deltas.get(i) {
            rec.advance(*delta)?;
        }
    }
    Ok(rec.finish())
}

// ===========================================================================
// Tests
// ===========================================================================
