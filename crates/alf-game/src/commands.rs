//! Player commands.
//!
//! Commands are plain data: they carry only the parameters needed to
//! describe intent and hold no reference to the state they target.

use alf_core::command::Command;
use serde::{Deserialize, Serialize};

/// Move the player by a delta. Unclamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveCommand {
    pub delta_x: f32,
    pub delta_y: f32,
}

impl MoveCommand {
    pub fn new(delta_x: f32, delta_y: f32) -> Self {
        Self { delta_x, delta_y }
    }
}

impl Command for MoveCommand {}

/// Reduce the player's health, flooring at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TakeDamageCommand {
    pub amount: f32,
}

impl TakeDamageCommand {
    pub fn new(amount: f32) -> Self {
        Self { amount }
    }
}

impl Command for TakeDamageCommand {}

/// Restore the player's health. No ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealCommand {
    pub amount: f32,
}

impl HealCommand {
    pub fn new(amount: f32) -> Self {
        Self { amount }
    }
}

impl Command for HealCommand {}

// ---------------------------------------------------------------------------
// GameCommand
// ---------------------------------------------------------------------------

/// Every command the game knows about, as one serializable value.
///
/// Used where commands must be stored: the tick-boundary queue and replay
/// logs. Dispatch still routes on the concrete command inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameCommand {
    Move(MoveCommand),
    TakeDamage(TakeDamageCommand),
    Heal(HealCommand),
}

impl GameCommand {
    /// The wrapped command as a dispatchable trait object.
    pub fn as_command(&self) -> &dyn Command {
        match self {
            GameCommand::Move(cmd) => cmd,
            GameCommand::TakeDamage(cmd) => cmd,
            GameCommand::Heal(cmd) => cmd,
        }
    }
}

impl From<MoveCommand> for GameCommand {
    fn from(cmd: MoveCommand) -> Self {
        GameCommand::Move(cmd)
    }
}

impl From<TakeDamageCommand> for GameCommand {
    fn from(cmd: TakeDamageCommand) -> Self {
        GameCommand::TakeDamage(cmd)
    }
}

impl From<HealCommand> for GameCommand {
    fn from(cmd: HealCommand) -> Self {
        GameCommand::Heal(cmd)
    }
}
