//! ALF Core -- the deterministic fixed-step logic framework.
//!
//! This crate provides the primitives a reproducible simulation is built
//! from: a fixed-step tick scheduler, observable state cells and
//! collections, typed commands with a static dispatcher, and a deterministic
//! state hash for replay verification.
//!
//! # Control Flow
//!
//! 1. The embedding driver feeds real-time deltas to [`tick::TickEngine::update`].
//! 2. The engine emits zero or more [`tick::TickContext`]s to its subscribers,
//!    in subscription order, one fixed step at a time.
//! 3. Subscribers (systems, command pumps) mutate state, which lives only in
//!    [`observable::Observable`] cells and [`collection::ObservableVec`]s.
//! 4. Commands reach state through [`dispatcher::CommandDispatcher::dispatch`],
//!    which routes each command to the one handler registered for its type.
//! 5. At any tick boundary a [`hash::StateHash`] over the current values
//!    summarises the state for replay comparison.
//!
//! Everything is single-threaded and synchronous: there are no background
//! threads, no locks, and no deferred execution inside the core.
//!
//! # Key Types
//!
//! - [`tick::TickEngine`] -- Accumulator-based fixed-step scheduler.
//! - [`observable::Observable`] -- Versioned value cell with change observers.
//! - [`collection::ObservableVec`] -- Ordered collection with add/remove observers.
//! - [`command::Command`] / [`command::CommandHandler`] -- Command contracts.
//! - [`dispatcher::CommandDispatcher`] -- Type-keyed static command routing.
//! - [`command_queue::CommandQueue`] -- Tick-boundary command FIFO with history.
//! - [`hash::StateHash`] -- Seeded polynomial hash over state values.
//! - [`error::SimError`] -- Construction, argument and routing errors.

pub mod collection;
pub mod command;
pub mod command_queue;
pub mod dispatcher;
pub mod error;
pub mod hash;
pub mod id;
pub mod observable;
pub mod tick;
