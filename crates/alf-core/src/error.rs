//! Error types shared by the tick engine and the command dispatcher.

/// Errors raised by the simulation core.
///
/// Every variant is surfaced synchronously to the caller of the offending
/// operation. The core never retries and never swallows an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// The fixed step handed to a [`TickEngine`](crate::tick::TickEngine)
    /// was zero, negative, or not finite.
    #[error("fixed delta time must be positive and finite, got {0}")]
    InvalidFixedDelta(f32),

    /// A real-time delta passed to `update` was negative or not finite, or
    /// pushed the accumulator so high that one step no longer changes it.
    #[error("real delta time must be finite, non-negative and resolvable, got {0}")]
    InvalidRealDelta(f32),

    /// A command was dispatched with no handler registered for its type.
    #[error("no handler registered for command type: {command}")]
    NoHandler { command: &'static str },
}
