//! Per-tick systems.

use crate::state::GameState;
use alf_core::tick::TickContext;
use std::rc::Rc;

/// Advances global time by the fixed step on every tick.
#[derive(Debug, Clone)]
pub struct TimeAdvanceSystem {
    state: Rc<GameState>,
}

impl TimeAdvanceSystem {
    pub fn new(state: Rc<GameState>) -> Self {
        Self { state }
    }

    /// Add `ctx.delta_time()` to the global clock.
    pub fn on_tick(&mut self, ctx: TickContext) {
        let next = self.state.global_time.get() + ctx.delta_time();
        self.state.global_time.set(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alf_core::tick::TickEngine;
    use std::cell::RefCell;

    #[test]
    fn each_tick_adds_the_fixed_step() {
        let state = Rc::new(GameState::new());
        let mut system = TimeAdvanceSystem::new(state.clone());

        system.on_tick(TickContext::new(0.25, 1));
        system.on_tick(TickContext::new(0.25, 2));

        assert_eq!(state.global_time.get(), 0.5);
        assert_eq!(state.global_time.version(), 2);
    }

    #[test]
    fn driven_by_tick_engine() {
        let state = Rc::new(GameState::new());
        let mut system = TimeAdvanceSystem::new(state.clone());
        let mut engine = TickEngine::new(0.125).unwrap();
        engine.subscribe(move |ctx| {
            system.on_tick(ctx);
            Ok(())
        });

        engine.update(0.4).unwrap();

        assert_eq!(engine.tick_count(), 3);
        assert_eq!(state.global_time.get(), 0.375);
    }

    #[test]
    fn clock_observer_can_hash_the_state() {
        let state = Rc::new(GameState::new());
        let hashes = Rc::new(RefCell::new(Vec::new()));
        let (weak, h) = (Rc::downgrade(&state), hashes.clone());
        state.global_time.subscribe(move |_| {
            if let Some(state) = weak.upgrade() {
                h.borrow_mut().push(state.deterministic_hash());
            }
        });

        TimeAdvanceSystem::new(state.clone()).on_tick(TickContext::new(0.02, 1));

        assert_eq!(*hashes.borrow(), vec![state.deterministic_hash()]);
    }
}
