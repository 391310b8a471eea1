//! Replay recording and playback for determinism checks.
//!
//! A [`ReplayLog`] holds the fixed step, the starting snapshot and every
//! driver operation applied to a simulation, in order. Playing it back on a
//! fresh [`Simulation`] reproduces the exact same state, and hash checkpoints
//! recorded alongside the entries let playback verify that it did.

use crate::commands::GameCommand;
use crate::config::SimConfig;
use crate::simulation::Simulation;
use crate::state::StateSnapshot;
use alf_core::error::SimError;
use alf_core::tick::TickContext;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("replay encode error: {0}")]
    Encode(String),
    #[error("replay decode error: {0}")]
    Decode(String),
    #[error("checkpoint {position} names entry {entry_index}, out of order or past the end")]
    InvalidCheckpoint { position: usize, entry_index: usize },
    #[error("replay diverged: {0}")]
    Sim(#[from] SimError),
}

// ---------------------------------------------------------------------------
// ReplayEntry
// ---------------------------------------------------------------------------

/// One driver operation, as recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReplayEntry {
    /// Queue a command for the next tick boundary.
    Submit(GameCommand),
    /// Dispatch a command immediately with an explicit tick index.
    Dispatch { tick_index: u64, command: GameCommand },
    /// Feed real time to the tick engine.
    Advance { real_delta: f32 },
}

// ---------------------------------------------------------------------------
// ReplayMismatch
// ---------------------------------------------------------------------------

/// Details about where replay verification failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayMismatch {
    /// The entry index where the mismatch was detected.
    pub entry_index: usize,
    /// Expected hash from the recording.
    pub expected_hash: u32,
    /// Actual hash from the replay.
    pub actual_hash: u32,
}

// ---------------------------------------------------------------------------
// ReplayLog
// ---------------------------------------------------------------------------

/// A recorded sequence of entries starting from a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayLog {
    pub fixed_delta_time: f32,
    /// State at the start of recording.
    pub initial: StateSnapshot,
    /// Recorded entries in order.
    pub entries: Vec<ReplayEntry>,
    /// Hash checkpoints: (entry_index, state_hash), taken after the entry ran.
    pub checkpoints: Vec<(usize, u32)>,
}

impl ReplayLog {
    pub fn new(fixed_delta_time: f32, initial: StateSnapshot) -> Self {
        Self {
            fixed_delta_time,
            initial,
            entries: Vec::new(),
            checkpoints: Vec::new(),
        }
    }

    /// Start a log for a simulation built from `config`.
    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.fixed_delta_time, config.initial)
    }

    /// Append an entry with no checkpoint.
    pub fn record(&mut self, entry: ReplayEntry) {
        self.entries.push(entry);
    }

    /// Record an entry together with the state hash observed after it ran.
    pub fn record_with_hash(&mut self, entry: ReplayEntry, hash: u32) {
        let index = self.entries.len();
        self.entries.push(entry);
        self.checkpoints.push((index, hash));
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// The configuration a replaying simulation is built with.
    pub fn config(&self) -> SimConfig {
        SimConfig {
            fixed_delta_time: self.fixed_delta_time,
            initial: self.initial,
            ..SimConfig::default()
        }
    }

    /// Encode the log to bytes (using bitcode).
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplayError> {
        bitcode::serialize(self).map_err(|e| ReplayError::Encode(e.to_string()))
    }

    /// Decode a log from bytes. Malformed input yields an error.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ReplayError> {
        bitcode::deserialize(data).map_err(|e| ReplayError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Recorder
// ---------------------------------------------------------------------------

/// Drives a [`Simulation`] and records every operation into a [`ReplayLog`].
///
/// Each `advance` is recorded with a hash checkpoint.
#[derive(Debug)]
pub struct Recorder {
    sim: Simulation,
    log: ReplayLog,
}

impl Recorder {
    pub fn new(config: &SimConfig) -> Result<Self, SimError> {
        Ok(Self {
            sim: Simulation::new(config)?,
            log: ReplayLog::from_config(config),
        })
    }

    /// Queue a command on the simulation and log it.
    pub fn submit(&mut self, command: impl Into<GameCommand>) {
        let command = command.into();
        self.sim.submit(command);
        self.log.record(ReplayEntry::Submit(command));
    }

    pub fn dispatch_now(&mut self, command: GameCommand, tick_index: u64) -> Result<(), SimError> {
        let ctx = TickContext::new(self.sim.fixed_delta_time(), tick_index);
        self.sim.dispatch_now(command.as_command(), ctx)?;
        self.log.record(ReplayEntry::Dispatch { tick_index, command });
        Ok(())
    }

    /// Feed real time and log it with the resulting state hash. A rejected
    /// delta is not logged.
    pub fn advance(&mut self, real_delta: f32) -> Result<u64, SimError> {
        let ticks = self.sim.advance(real_delta)?;
        self.log
            .record_with_hash(ReplayEntry::Advance { real_delta }, self.sim.state_hash());
        Ok(ticks)
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn log(&self) -> &ReplayLog {
        &self.log
    }

    /// Stop recording, returning the simulation and the finished log.
    pub fn finish(self) -> (Simulation, ReplayLog) {
        (self.sim, self.log)
    }
}

// ---------------------------------------------------------------------------
// ReplayResult
// ---------------------------------------------------------------------------

/// The result of replaying a log.
#[derive(Debug)]
pub struct ReplayResult {
    /// Number of entries applied.
    pub entries_applied: usize,
    /// Whether all hash checkpoints matched.
    pub is_verified: bool,
    /// First mismatch encountered (if any).
    pub first_mismatch: Option<ReplayMismatch>,
}

// ---------------------------------------------------------------------------
// Replay execution
// ---------------------------------------------------------------------------

fn apply_entry(sim: &mut Simulation, entry: &ReplayEntry) -> Result<(), SimError> {
    match *entry {
        ReplayEntry::Submit(command) => sim.submit(command),
        ReplayEntry::Dispatch {
            tick_index,
            command,
        } => {
            let ctx = TickContext::new(sim.fixed_delta_time(), tick_index);
            sim.dispatch_now(command.as_command(), ctx)?;
        }
        ReplayEntry::Advance { real_delta } => {
            sim.advance(real_delta)?;
        }
    }
    Ok(())
}

/// Every checkpoint must name an existing entry, in non-decreasing order.
fn check_checkpoints(log: &ReplayLog) -> Result<(), ReplayError> {
    let mut previous = 0;
    for (position, &(entry_index, _)) in log.checkpoints.iter().enumerate() {
        if entry_index < previous || entry_index >= log.entries.len() {
            return Err(ReplayError::InvalidCheckpoint {
                position,
                entry_index,
            });
        }
        previous = entry_index;
    }
    Ok(())
}

/// Replay a log and verify hash checkpoints.
///
/// A log whose checkpoints cannot all be reached is rejected before any
/// entry is applied.
pub fn replay_and_verify(log: &ReplayLog) -> Result<ReplayResult, ReplayError> {
    check_checkpoints(log)?;
    let mut sim = Simulation::new(&log.config())?;

    let mut first_mismatch: Option<ReplayMismatch> = None;
    let mut checkpoint_idx = 0;

    for (i, entry) in log.entries.iter().enumerate() {
        apply_entry(&mut sim, entry)?;

        // Check if this entry index has a hash checkpoint.
        while checkpoint_idx < log.checkpoints.len() && log.checkpoints[checkpoint_idx].0 == i {
            let (_, expected_hash) = log.checkpoints[checkpoint_idx];
            let actual_hash = sim.state_hash();
            if actual_hash != expected_hash && first_mismatch.is_none() {
                warn!(
                    entry = i,
                    expected_hash, actual_hash, "replay checkpoint mismatch"
                );
                first_mismatch = Some(ReplayMismatch {
                    entry_index: i,
                    expected_hash,
                    actual_hash,
                });
            }
            checkpoint_idx += 1;
        }
    }

    debug!(
        entries = log.entries.len(),
        checkpoints = log.checkpoints.len(),
        verified = first_mismatch.is_none(),
        "replay finished"
    );

    Ok(ReplayResult {
        entries_applied: log.entries.len(),
        is_verified: first_mismatch.is_none(),
        first_mismatch,
    })
}

/// Replay a log without verification, returning the final simulation.
pub fn replay(log: &ReplayLog) -> Result<Simulation, ReplayError> {
    let mut sim = Simulation::new(&log.config())?;
    for entry in &log.entries {
        apply_entry(&mut sim, entry)?;
    }
    Ok(sim)
}

// ===========================================================================
// Tests
// ===========================================================================
