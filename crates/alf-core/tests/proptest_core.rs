//! Property-based tests for the ALF core primitives.
//!
//! Uses proptest to generate random delta sequences and write sequences,
//! then verify the scheduling and versioning invariants hold.

use alf_core::collection::ObservableVec;
use alf_core::observable::Observable;
use alf_core::tick::TickEngine;
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

// ===========================================================================
// Generators
// ===========================================================================

/// Step used by the scheduling properties. Deltas are whole multiples of
/// `QUANTUM`, and both are exact binary fractions, so every sum is exact.
const STEP: f32 = 0.25;
const QUANTUM: f32 = 0.0625;

fn arb_deltas(max_len: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec((0..40u32).prop_map(|q| q as f32 * QUANTUM), 0..=max_len)
}

fn run_chunked(deltas: &[f32]) -> (Vec<u64>, TickEngine) {
    let mut engine = TickEngine::new(STEP).unwrap();
    let ticks = Rc::new(RefCell::new(Vec::new()));
    let t = ticks.clone();
    engine.subscribe(move |ctx| {
        t.borrow_mut().push(ctx.tick_index());
        Ok(())
    });
    for &d in deltas {
        engine.update(d).unwrap();
    }
    let seen = ticks.borrow().clone();
    (seen, engine)
}

#[derive(Debug, Clone)]
enum VecOp {
    Push(u8),
    Remove(u8),
}

fn arb_vec_ops(max_ops: usize) -> impl Strategy<Value = Vec<VecOp>> {
    proptest::collection::vec(
        prop_oneof![
            (0..4u8).prop_map(VecOp::Push),
            (0..4u8).prop_map(VecOp::Remove),
        ],
        1..=max_ops,
    )
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Total ticks equal floor(sum / step), however the time was chunked.
    #[test]
    fn accumulator_conserves_time(deltas in arb_deltas(32)) {
        let (ticks, engine) = run_chunked(&deltas);
        let total: f64 = deltas.iter().map(|&d| f64::from(d)).sum();
        let expected = (total / f64::from(STEP)).floor() as u64;

        prop_assert_eq!(engine.tick_count(), expected);
        prop_assert_eq!(ticks.len() as u64, expected);
        let remainder = total - expected as f64 * f64::from(STEP);
        prop_assert!((engine.accumulator() - remainder).abs() < 1e-9);
    }

    /// Splitting the same total into one call or many yields the same ticks.
    #[test]
    fn chunking_is_irrelevant(deltas in arb_deltas(32)) {
        let total: f32 = deltas.iter().sum();
        let (chunked, _) = run_chunked(&deltas);
        let (single, _) = run_chunked(&[total]);
        prop_assert_eq!(chunked, single);
    }

    /// Tick indices are 1..=n in order and alpha stays in [0, 1).
    #[test]
    fn indices_are_contiguous_and_alpha_bounded(deltas in arb_deltas(32)) {
        let (ticks, engine) = run_chunked(&deltas);
        let expected: Vec<u64> = (1..=ticks.len() as u64).collect();
        prop_assert_eq!(ticks, expected);
        let alpha = engine.interpolation_alpha();
        prop_assert!((0.0..1.0).contains(&alpha));
    }

    /// Each write bumps the version by exactly one iff the value changes,
    /// and fires exactly one notification in that case.
    #[test]
    fn version_tracks_changes(writes in proptest::collection::vec(0..5i32, 0..64)) {
        let cell = Observable::new(0);
        let fired = Rc::new(RefCell::new(0u64));
        let f = fired.clone();
        cell.subscribe(move |_| *f.borrow_mut() += 1);

        let mut expected_version = 0u64;
        for w in writes {
            let before = cell.get();
            let changed = cell.set(w);
            prop_assert_eq!(changed, before != w);
            if changed {
                expected_version += 1;
            }
            prop_assert_eq!(cell.version(), expected_version);
            prop_assert_eq!(*fired.borrow(), expected_version);
            prop_assert_eq!(cell.get(), w);
        }
    }

    /// Every successful push/remove fires exactly one matching notification.
    #[test]
    fn collection_notifies_once_per_change(ops in arb_vec_ops(64)) {
        let mut items = ObservableVec::new();
        let added = Rc::new(RefCell::new(Vec::new()));
        let removed = Rc::new(RefCell::new(Vec::new()));
        let a = added.clone();
        let r = removed.clone();
        items.on_added(move |v: &u8| a.borrow_mut().push(*v));
        items.on_removed(move |v: &u8| r.borrow_mut().push(*v));

        let mut model: Vec<u8> = Vec::new();
        let mut expected_added = Vec::new();
        let mut expected_removed = Vec::new();
        for op in ops {
            match op {
                VecOp::Push(v) => {
                    items.push(v);
                    model.push(v);
                    expected_added.push(v);
                }
                VecOp::Remove(v) => {
                    let hit = items.remove(&v);
                    let pos = model.iter().position(|x| *x == v);
                    prop_assert_eq!(hit, pos.is_some());
                    if let Some(p) = pos {
                        model.remove(p);
                        expected_removed.push(v);
                    }
                }
            }
        }

        prop_assert_eq!(items.as_slice(), model.as_slice());
        prop_assert_eq!(&*added.borrow(), &expected_added);
        prop_assert_eq!(&*removed.borrow(), &expected_removed);
    }
}
