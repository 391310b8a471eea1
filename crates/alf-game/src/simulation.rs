//! The composition root: one fully wired simulation.
//!
//! [`Simulation`] owns the game state, a dispatcher with every player handler
//! registered, the tick-boundary command queue and the tick engine. Two tick
//! subscribers are installed at construction, in this order:
//!
//! 1. the command pump, which drains the queue and dispatches each command
//!    with the current tick's context, in submission order;
//! 2. the [`TimeAdvanceSystem`], which adds the fixed step to global time.
//!
//! Systems added later through [`Simulation::subscribe`] run after both.

use crate::commands::GameCommand;
use crate::config::SimConfig;
use crate::handlers::register_player_handlers;
use crate::state::{GameState, StateSnapshot};
use crate::store::GameStateStore;
use crate::systems::TimeAdvanceSystem;
use alf_core::command::{Command, CommandHandler};
use alf_core::command_queue::CommandQueue;
use alf_core::dispatcher::CommandDispatcher;
use alf_core::error::SimError;
use alf_core::id::SubscriptionId;
use alf_core::tick::{TickContext, TickEngine};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

/// Routing and queueing are mutated from inside the tick loop.
type Shared<T> = Rc<RefCell<T>>;

/// A deterministic game simulation driven by real-time deltas.
pub struct Simulation {
    state: Rc<GameState>,
    dispatcher: Shared<CommandDispatcher>,
    queue: Shared<CommandQueue<GameCommand>>,
    engine: TickEngine,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("snapshot", &self.snapshot())
            .field("engine", &self.engine)
            .field("pending_commands", &self.pending_commands())
            .finish()
    }
}

impl Simulation {
    /// Build a simulation starting from `config.initial`.
    pub fn new(config: &SimConfig) -> Result<Self, SimError> {
        Self::from_snapshot(config, &config.initial)
    }

    /// Build a simulation starting from `snapshot` instead of the
    /// configured initial state.
    pub fn from_snapshot(config: &SimConfig, snapshot: &StateSnapshot) -> Result<Self, SimError> {
        let sim = Self::with_state(config, GameState::from_snapshot(snapshot))?;
        info!(
            fixed_delta_time = config.fixed_delta_time,
            hash = sim.state_hash(),
            "simulation constructed"
        );
        Ok(sim)
    }

    /// Build a simulation from whatever state `store` holds.
    pub fn from_store(config: &SimConfig, store: &impl GameStateStore) -> Result<Self, SimError> {
        let sim = Self::with_state(config, store.load())?;
        info!(
            fixed_delta_time = config.fixed_delta_time,
            hash = sim.state_hash(),
            "simulation restored from store"
        );
        Ok(sim)
    }

    fn with_state(config: &SimConfig, state: GameState) -> Result<Self, SimError> {
        let mut engine = TickEngine::new(config.fixed_delta_time)?;

        let mut dispatcher = CommandDispatcher::new();
        register_player_handlers(&mut dispatcher, &state.player);

        let state = Rc::new(state);
        let dispatcher = Rc::new(RefCell::new(dispatcher));
        let queue = Rc::new(RefCell::new(CommandQueue::with_max_history(
            config.command_history,
        )));

        engine.subscribe(command_pump(queue.clone(), dispatcher.clone()));
        let mut time = TimeAdvanceSystem::new(state.clone());
        engine.subscribe(move |ctx| {
            time.on_tick(ctx);
            Ok(())
        });

        Ok(Self {
            state,
            dispatcher,
            queue,
            engine,
        })
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Queue a command for the next tick boundary.
    pub fn submit(&mut self, command: impl Into<GameCommand>) {
        self.queue.borrow_mut().push(command.into());
    }

    /// Feed real time. Returns the number of ticks that ran.
    pub fn advance(&mut self, real_delta: f32) -> Result<u64, SimError> {
        self.engine.update(real_delta)
    }

    /// Dispatch a command immediately, outside the queue.
    pub fn dispatch_now(&mut self, command: &dyn Command, ctx: TickContext) -> Result<(), SimError> {
        self.dispatcher.borrow_mut().dispatch(command, ctx)
    }

    /// Drop every queued command that has not reached a tick yet.
    pub fn discard_pending(&mut self) -> Vec<GameCommand> {
        self.queue.borrow_mut().take_pending()
    }

    /// Route `C` to `handler`, replacing any earlier handler for `C`.
    pub fn register_handler<C, H>(&mut self, handler: H) -> bool
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        self.dispatcher.borrow_mut().register::<C, H>(handler)
    }

    /// Add a tick system. It runs after the built-in systems.
    pub fn subscribe(
        &mut self,
        system: impl FnMut(TickContext) -> Result<(), SimError> + 'static,
    ) -> SubscriptionId {
        self.engine.subscribe(system)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.engine.unsubscribe(id)
    }

    /// Save the current state to `store`.
    pub fn checkpoint(&self, store: &mut impl GameStateStore) {
        store.save(&self.state);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The live state. Its cells can be observed directly.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// A handle to the state for observers that need to read it later.
    pub fn shared_state(&self) -> Rc<GameState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.state.snapshot()
    }

    /// Deterministic hash of the current state.
    pub fn state_hash(&self) -> u32 {
        self.state.deterministic_hash()
    }

    /// Ticks emitted since construction.
    pub fn tick_count(&self) -> u64 {
        self.engine.tick_count()
    }

    pub fn fixed_delta_time(&self) -> f32 {
        self.engine.fixed_delta_time()
    }

    /// How far real time has moved into the next tick, in `[0, 1)`.
    pub fn interpolation_alpha(&self) -> f64 {
        self.engine.interpolation_alpha()
    }

    /// Commands waiting for the next tick boundary.
    pub fn pending_commands(&self) -> usize {
        self.queue.borrow().pending_count()
    }

    /// Drained commands tagged with the tick that drained them, oldest
    /// first. Empty unless `command_history` was configured.
    pub fn command_history(&self) -> Vec<(u64, GameCommand)> {
        self.queue.borrow().history().to_vec()
    }
}

/// Tick subscriber that empties the queue at each tick boundary.
///
/// On a routing error the failing command and everything behind it go back
/// to the front of the queue, and the error aborts the tick.
fn command_pump(
    queue: Shared<CommandQueue<GameCommand>>,
    dispatcher: Shared<CommandDispatcher>,
) -> impl FnMut(TickContext) -> Result<(), SimError> {
    move |ctx| {
        let drained = queue.borrow_mut().drain(ctx.tick_index());
        let mut dispatcher = dispatcher.borrow_mut();
        let mut commands = drained.into_iter();
        while let Some(command) = commands.next() {
            if let Err(err) = dispatcher.dispatch(command.as_command(), ctx) {
                queue
                    .borrow_mut()
                    .requeue_front(std::iter::once(command).chain(commands));
                return Err(err);
            }
        }
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
