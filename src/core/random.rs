use std::{cell::RefCell, ops::RangeInclusive};

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

/// Seeded pseudo-random source shared by every component of a run.
///
/// A run creates exactly one source and lends it by reference to the reader,
/// the partition key processor, the throttle and the retry policy, so a given
/// seed always replays the same sequence of draws.
pub struct RandomSource {
    rng: RefCell<StdRng>,
}

impl RandomSource {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Runs `f` with exclusive access to the underlying generator.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        f(&mut self.rng.borrow_mut())
    }

    pub fn range(&self, range: RangeInclusive<u64>) -> u64 {
        self.with_rng(|rng| rng.random_range(range))
    }

    pub fn choose<'b, T>(&self, items: &'b [T]) -> Option<&'b T> {
        self.with_rng(|rng| items.choose(rng))
    }
}
