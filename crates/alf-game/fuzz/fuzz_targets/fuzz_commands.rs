#![no_main]
use alf_core::tick::TickContext;
use alf_game::test_utils::*;
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

const STEP: f32 = 0.02;

/// A structured driver operation for fuzzing.
#[derive(Arbitrary, Debug)]
enum FuzzOp {
    Move { x: f32, y: f32 },
    Damage { amount: f32 },
    Heal { amount: f32 },
    DispatchDamage { amount: f32, tick: u8 },
    /// Real time in milliseconds.
    Advance { millis: u8 },
}

/// Top-level fuzz input: a sequence of operations.
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    ops: Vec<FuzzOp>,
}

fuzz_target!(|input: FuzzInput| {
    let mut sim = make_sim(STEP);

    // Limit operations to prevent timeouts.
    let max_ops = input.ops.len().min(500);

    for op in &input.ops[..max_ops] {
        match *op {
            FuzzOp::Move { x, y } => sim.submit(move_by(x, y)),
            FuzzOp::Damage { amount } => sim.submit(damage(amount)),
            FuzzOp::Heal { amount } => sim.submit(heal(amount)),
            FuzzOp::DispatchDamage { amount, tick } => {
                let ctx = TickContext::new(STEP, u64::from(tick) + 1);
                sim.dispatch_now(damage(amount).as_command(), ctx)
                    .expect("damage is always routed");
            }
            FuzzOp::Advance { millis } => {
                sim.advance(f32::from(millis) / 1000.0)
                    .expect("non-negative finite delta");
            }
        }

        // Health invariant: never below zero, whatever the amounts were.
        let hp = health(&sim);
        assert!(hp >= 0.0, "health went below zero: {hp}");
    }

    let alpha = sim.interpolation_alpha();
    assert!((0.0..1.0).contains(&alpha), "alpha out of range: {alpha}");
});
