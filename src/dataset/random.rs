//! Seeded pseudo-random stream for reproducible dataset generation.
//!
//! Every reproducibility guarantee in the crate bottoms out here: the
//! generator is a plain 64-bit linear congruential recurrence with no
//! floating-point state and no hardware entropy, so an identical seed
//! produces a byte-identical sequence on every platform. Rebuilding a
//! generator from the same seed replays the sequence from the start.

/// LCG multiplier (Numerical Recipes).
const MULTIPLIER: u64 = 1_664_525;
/// LCG increment (Numerical Recipes).
const INCREMENT: u64 = 1_013_904_223;
/// Modulus; also the divisor mapping state into `[0, 1)`.
const MODULUS: u64 = u64::MAX;

/// Deterministic pseudo-random generator seeded with a `u64`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    /// Create a generator from an integer seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = MULTIPLIER
            .wrapping_mul(self.state)
            .wrapping_add(INCREMENT)
            % MODULUS;
        self.state as f64 / MODULUS as f64
    }

    /// Next integer in `[low, high)`.
    ///
    /// # Panics
    ///
    /// Panics if `low >= high`.
    pub fn next_int(&mut self, low: i64, high: i64) -> i64 {
        assert!(low < high, "empty range {low}..{high}");
        let span = (high - low) as f64;
        low + (self.next_f64() * span) as i64
    }

    /// Next boolean, `true` with the given probability.
    pub fn next_bool(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        for _ in 0..1000 {
            assert!((a.next_f64() - b.next_f64()).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(43);
        let same = (0..100)
            .filter(|_| (a.next_f64() - b.next_f64()).abs() < f64::EPSILON)
            .count();
        assert!(same < 100);
    }

    #[test]
    fn values_stay_in_unit_interval() {
        let mut rng = SeededRandom::new(7);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn next_int_stays_in_range() {
        let mut rng = SeededRandom::new(99);
        for _ in 0..10_000 {
            let v = rng.next_int(100, 50_001);
            assert!((100..50_001).contains(&v));
        }
    }

    #[test]
    fn next_bool_tracks_probability() {
        let mut rng = SeededRandom::new(42);
        let trues = (0..100_000).filter(|_| rng.next_bool(0.7)).count();
        let ratio = trues as f64 / 100_000.0;
        assert!((0.68..0.72).contains(&ratio), "ratio was {ratio}");
    }

    #[test]
    fn restart_replays_prefix() {
        let mut first = SeededRandom::new(1234);
        let prefix: Vec<f64> = (0..32).map(|_| first.next_f64()).collect();

        let mut replay = SeededRandom::new(1234);
        for expected in prefix {
            assert!((replay.next_f64() - expected).abs() < f64::EPSILON);
        }
    }
}
