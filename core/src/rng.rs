//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through ModeRng instances derived
//! from the single master seed handed to the GenerationEngine.
//!
//! Each mode gets its own RNG stream, seeded deterministically
//! from (master_seed XOR mode_index). This means:
//!   - Adding a new mode never changes existing modes' shuffles.
//!   - Each mode's population order is reproducible in isolation.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A deterministic RNG for a single mode.
pub struct ModeRng {
    inner: Pcg64Mcg,
}

impl ModeRng {
    /// Create a mode RNG from the master seed and a stable
    /// mode index. The index is the mode's position in the config.
    pub fn new(master_seed: u64, mode_index: u64) -> Self {
        let derived_seed = master_seed ^ (mode_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }
}

impl RngCore for ModeRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// All mode RNGs for a single generation run.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_mode(&self, mode_index: usize) -> ModeRng {
        ModeRng::new(self.master_seed, mode_index as u64)
    }
}
