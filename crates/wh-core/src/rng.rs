//! Deterministic simulation RNG.
//!
//! Randomness is only used while building the initial world (which storage
//! cells receive a rack).  Everything after construction is deterministic, so
//! the same seed always produces the same run.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Simulation-level RNG for world construction.
///
/// Used only in single-threaded contexts.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `percent / 100`.  Mirrors a "roll 1..=100 and
    /// compare" fill rule: 0 never fires, 100 always fires.
    #[inline]
    pub fn percent_chance(&mut self, percent: u8) -> bool {
        self.0.gen_range(1..=100u8) <= percent
    }
}
