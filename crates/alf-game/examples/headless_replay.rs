//! Headless driver: record a scripted session, encode it, replay and verify.
//!
//! Usage: `cargo run -p alf-game --example headless_replay [config.{ron,toml,json}]`
//! Set `RUST_LOG=debug` (or `trace`) to see registration and per-tick logs.

use alf_game::commands::{HealCommand, MoveCommand, TakeDamageCommand};
use alf_game::config::SimConfig;
use alf_game::replay::{replay_and_verify, Recorder, ReplayLog};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Irregular frame times, in seconds, cycled through by the driver.
const FRAMES: [f32; 5] = [0.016, 0.033, 0.007, 0.050, 0.021];

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::load(Path::new(&path))?,
        None => SimConfig::default(),
    };

    let mut rec = Recorder::new(&config)?;
    for frame in 0..120usize {
        match frame % 30 {
            0 => rec.submit(MoveCommand::new(1.5, -0.5)),
            10 => rec.submit(TakeDamageCommand::new(7.5)),
            20 => rec.submit(HealCommand::new(2.0)),
            _ => {}
        }
        rec.advance(FRAMES[frame % FRAMES.len()])?;
    }

    let (sim, log) = rec.finish();
    let snapshot = sim.snapshot();
    info!(
        ticks = sim.tick_count(),
        alpha = sim.interpolation_alpha(),
        health = snapshot.health,
        x = snapshot.position_x,
        y = snapshot.position_y,
        hash = sim.state_hash(),
        "session recorded"
    );

    let bytes = log.to_bytes()?;
    let decoded = ReplayLog::from_bytes(&bytes)?;
    let result = replay_and_verify(&decoded)?;
    info!(
        bytes = bytes.len(),
        entries = result.entries_applied,
        verified = result.is_verified,
        "replay checked"
    );

    if let Some(mismatch) = result.first_mismatch {
        return Err(format!(
            "replay diverged at entry {}: expected {:#010x}, got {:#010x}",
            mismatch.entry_index, mismatch.expected_hash, mismatch.actual_hash
        )
        .into());
    }
    Ok(())
}
