//! Deterministic state hashing for replay verification.
//!
//! [`StateHash`] is a polynomial accumulator with a fixed seed and a fixed
//! multiplier. It involves no per-process salt, so identical field values
//! always produce the identical hash on every platform and across restarts.
//! It is not cryptographic and is never used for simulation logic.

/// Polynomial hash builder: `h = h * 31 + field`, starting from 17.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(u32);

impl StateHash {
    pub const SEED: u32 = 17;
    pub const MULTIPLIER: u32 = 31;

    /// Start a new hash at the seed.
    pub fn new() -> Self {
        Self(Self::SEED)
    }

    /// Fold one 32-bit field contribution into the hash.
    pub fn write_u32(&mut self, v: u32) {
        self.0 = self.0.wrapping_mul(Self::MULTIPLIER).wrapping_add(v);
    }

    /// Feed an f32 into the hash using [`f32_bits`].
    pub fn write_f32(&mut self, v: f32) {
        self.write_u32(f32_bits(v));
    }

    /// Finalize and return the hash value.
    pub fn finish(self) -> u32 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}

/// Bit-level hash contribution of an `f32`.
///
/// Values that compare equal contribute equally: `-0.0` folds onto `0.0` and
/// every NaN folds onto the canonical quiet NaN.
pub fn f32_bits(v: f32) -> u32 {
    if v == 0.0 {
        0
    } else if v.is_nan() {
        f32::NAN.to_bits()
    } else {
        v.to_bits()
    }
}
