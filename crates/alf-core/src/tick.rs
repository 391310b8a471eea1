//! Fixed-step tick scheduling.
//!
//! The [`TickEngine`] converts irregular real-time deltas into a whole number
//! of fixed-size logic steps. Unconsumed time stays in the accumulator and
//! carries into the next [`update`](TickEngine::update), so the number of ticks
//! emitted depends only on the cumulative real time fed in, never on how that
//! time was chunked across calls.

use crate::error::SimError;
use crate::id::SubscriptionId;
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Tick context
// ---------------------------------------------------------------------------

/// Read-only context for one logic step.
///
/// Created by the engine once per emitted tick and passed by value to every
/// subscriber, handler and system that runs during that step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    delta_time: f32,
    tick_index: u64,
}

impl TickContext {
    pub const fn new(delta_time: f32, tick_index: u64) -> Self {
        Self {
            delta_time,
            tick_index,
        }
    }

    /// Fixed step duration in seconds.
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// 1-based index of this tick since the last reset.
    pub const fn tick_index(&self) -> u64 {
        self.tick_index
    }
}

// ---------------------------------------------------------------------------
// Subscribers
// ---------------------------------------------------------------------------

/// A tick subscriber. Returning an error aborts the rest of the current
/// `update` call.
pub type TickSubscriber = Box<dyn FnMut(TickContext) -> Result<(), SimError>>;

// ---------------------------------------------------------------------------
// TickEngine
// ---------------------------------------------------------------------------

/// Fixed-step scheduler driven by variable real-time input.
pub struct TickEngine {
    /// Duration of one logic step in seconds. Immutable after construction.
    fixed_delta_time: f32,

    /// Unconsumed real time in seconds. Kept in `f64` so repeated small
    /// deltas do not lose precision against the `f32` step.
    accumulator: f64,

    /// Ticks emitted since construction or the last reset.
    tick_count: u64,

    subscribers: Vec<(SubscriptionId, TickSubscriber)>,
    next_subscription: u64,
}

impl std::fmt::Debug for TickEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickEngine")
            .field("fixed_delta_time", &self.fixed_delta_time)
            .field("accumulator", &self.accumulator)
            .field("tick_count", &self.tick_count)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl TickEngine {
    /// Create an engine with the given fixed step in seconds.
    pub fn new(fixed_delta_time: f32) -> Result<Self, SimError> {
        if !fixed_delta_time.is_finite() || fixed_delta_time <= 0.0 {
            return Err(SimError::InvalidFixedDelta(fixed_delta_time));
        }
        Ok(Self {
            fixed_delta_time,
            accumulator: 0.0,
            tick_count: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
        })
    }

    /// Duration of one logic step in seconds.
    pub fn fixed_delta_time(&self) -> f32 {
        self.fixed_delta_time
    }

    /// Ticks emitted since construction or the last [`reset`](Self::reset).
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Real time fed in but not yet consumed by a tick.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Fraction of the next tick already accumulated, in `[0, 1)`.
    ///
    /// Presentation layers use this to interpolate between the last completed
    /// tick and the next one.
    pub fn interpolation_alpha(&self) -> f64 {
        self.accumulator / f64::from(self.fixed_delta_time)
    }

    /// Register a subscriber. Subscribers fire in registration order.
    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(TickContext) -> Result<(), SimError> + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        debug!(subscription = id.0, "tick subscriber added");
        id
    }

    /// Remove a subscriber. Returns `false` if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        let removed = self.subscribers.len() != before;
        if removed {
            debug!(subscription = id.0, "tick subscriber removed");
        }
        removed
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Feed `real_delta` seconds of real time and emit every tick that fits.
    ///
    /// Returns the number of ticks emitted by this call. Within one call
    /// ticks fire in increasing index order, and every subscriber sees a tick
    /// before the accumulator is charged for it. If a subscriber fails, the
    /// loop stops and the accumulator and tick count keep the values they had
    /// after the last fully completed tick.
    ///
    /// A delta that would leave the accumulator too large for one step to
    /// reduce it is rejected up front, with nothing changed.
    pub fn update(&mut self, real_delta: f32) -> Result<u64, SimError> {
        if !real_delta.is_finite() || real_delta < 0.0 {
            return Err(SimError::InvalidRealDelta(real_delta));
        }

        let step = f64::from(self.fixed_delta_time);
        let next = self.accumulator + f64::from(real_delta);
        if next - step >= next {
            return Err(SimError::InvalidRealDelta(real_delta));
        }
        self.accumulator = next;
        let mut emitted = 0;

        while self.accumulator >= step {
            let ctx = TickContext::new(self.fixed_delta_time, self.tick_count + 1);
            trace!(tick = ctx.tick_index(), "emitting tick");
            for (_, subscriber) in &mut self.subscribers {
                subscriber(ctx)?;
            }
            self.tick_count = ctx.tick_index();
            self.accumulator -= step;
            emitted += 1;
        }

        Ok(emitted)
    }

    /// Zero the accumulator and tick count. Subscriptions are kept.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.tick_count = 0;
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record_ticks(engine: &mut TickEngine) -> Rc<RefCell<Vec<u64>>> {
        let ticks = Rc::new(RefCell::new(Vec::new()));
        let t = ticks.clone();
        engine.subscribe(move |ctx| {
            t.borrow_mut().push(ctx.tick_index());
            Ok(())
        });
        ticks
    }

    #[test]
    fn rejects_non_positive_fixed_delta() {
        assert_eq!(
            TickEngine::new(0.0).unwrap_err(),
            SimError::InvalidFixedDelta(0.0)
        );
        assert!(TickEngine::new(-0.02).is_err());
        assert!(TickEngine::new(f32::NAN).is_err());
        assert!(TickEngine::new(f32::INFINITY).is_err());
    }

    #[test]
    fn new_engine_starts_idle() {
        let engine = TickEngine::new(0.02).unwrap();
        assert_eq!(engine.tick_count(), 0);
        assert_eq!(engine.accumulator(), 0.0);
        assert_eq!(engine.interpolation_alpha(), 0.0);
        assert_eq!(engine.fixed_delta_time(), 0.02);
    }

    #[test]
    fn update_emits_whole_ticks_in_order() {
        let mut engine = TickEngine::new(0.02).unwrap();
        let ticks = record_ticks(&mut engine);

        let emitted = engine.update(0.05).unwrap();

        assert_eq!(emitted, 2);
        assert_eq!(*ticks.borrow(), vec![1, 2]);
        assert_eq!(engine.tick_count(), 2);
        assert!((engine.interpolation_alpha() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn small_deltas_accumulate_into_a_tick() {
        let mut engine = TickEngine::new(0.25).unwrap();
        let ticks = record_ticks(&mut engine);

        assert_eq!(engine.update(0.125).unwrap(), 0);
        assert_eq!(engine.interpolation_alpha(), 0.5);
        assert_eq!(engine.update(0.125).unwrap(), 1);

        assert_eq!(*ticks.borrow(), vec![1]);
        assert_eq!(engine.accumulator(), 0.0);
    }

    #[test]
    fn zero_delta_emits_nothing() {
        let mut engine = TickEngine::new(0.02).unwrap();
        let ticks = record_ticks(&mut engine);
        assert_eq!(engine.update(0.0).unwrap(), 0);
        assert!(ticks.borrow().is_empty());
    }

    #[test]
    fn negative_delta_is_rejected_without_side_effects() {
        let mut engine = TickEngine::new(0.25).unwrap();
        engine.update(0.125).unwrap();

        assert_eq!(
            engine.update(-0.01).unwrap_err(),
            SimError::InvalidRealDelta(-0.01)
        );
        assert!(engine.update(f32::NAN).is_err());
        assert_eq!(engine.accumulator(), 0.125);
    }

    #[test]
    fn unresolvable_delta_is_rejected_without_side_effects() {
        let mut engine = TickEngine::new(0.02).unwrap();
        let ticks = record_ticks(&mut engine);

        assert_eq!(
            engine.update(1.0e17).unwrap_err(),
            SimError::InvalidRealDelta(1.0e17)
        );
        assert_eq!(engine.update(f32::MAX), Err(SimError::InvalidRealDelta(f32::MAX)));
        assert_eq!(engine.tick_count(), 0);
        assert_eq!(engine.accumulator(), 0.0);
        assert!(ticks.borrow().is_empty());
    }

    #[test]
    fn subscribers_fire_in_registration_order_per_tick() {
        let mut engine = TickEngine::new(0.5).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        for name in ["first", "second"] {
            let l = log.clone();
            engine.subscribe(move |ctx| {
                l.borrow_mut().push((ctx.tick_index(), name));
                Ok(())
            });
        }

        engine.update(1.0).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![(1, "first"), (1, "second"), (2, "first"), (2, "second")]
        );
    }

    #[test]
    fn context_carries_fixed_delta() {
        let mut engine = TickEngine::new(0.125).unwrap();
        let deltas = Rc::new(RefCell::new(Vec::new()));
        let d = deltas.clone();
        engine.subscribe(move |ctx| {
            d.borrow_mut().push(ctx.delta_time());
            Ok(())
        });

        engine.update(0.5).unwrap();

        assert_eq!(*deltas.borrow(), vec![0.125; 4]);
    }

    #[test]
    fn subscriber_error_stops_after_last_completed_tick() {
        let mut engine = TickEngine::new(0.25).unwrap();
        let ticks = record_ticks(&mut engine);
        engine.subscribe(|ctx| {
            if ctx.tick_index() == 3 {
                Err(SimError::NoHandler { command: "Boom" })
            } else {
                Ok(())
            }
        });

        let err = engine.update(1.0).unwrap_err();

        assert_eq!(err, SimError::NoHandler { command: "Boom" });
        assert_eq!(engine.tick_count(), 2);
        assert_eq!(engine.accumulator(), 0.5);
        // The first subscriber already saw tick 3 before the failure.
        assert_eq!(*ticks.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn reset_keeps_subscriptions() {
        let mut engine = TickEngine::new(0.25).unwrap();
        let ticks = record_ticks(&mut engine);
        engine.update(0.6).unwrap();

        engine.reset();
        assert_eq!(engine.tick_count(), 0);
        assert_eq!(engine.accumulator(), 0.0);
        assert_eq!(engine.subscriber_count(), 1);

        engine.update(0.25).unwrap();
        assert_eq!(*ticks.borrow(), vec![1, 2, 1]);
    }

    #[test]
    fn unsubscribe_removes_only_that_subscriber() {
        let mut engine = TickEngine::new(0.25).unwrap();
        let kept = record_ticks(&mut engine);
        let dropped = Rc::new(RefCell::new(0));
        let d = dropped.clone();
        let id = engine.subscribe(move |_| {
            *d.borrow_mut() += 1;
            Ok(())
        });

        assert!(engine.unsubscribe(id));
        assert!(!engine.unsubscribe(id));
        engine.update(0.5).unwrap();

        assert_eq!(*dropped.borrow(), 0);
        assert_eq!(*kept.borrow(), vec![1, 2]);
    }
}
