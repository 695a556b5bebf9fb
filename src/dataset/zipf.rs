//! Zipfian distribution generator.
//!
//! Maps uniform draws to Zipf-distributed ranks: `P(k) ∝ 1 / k^s`,
//! normalized by the generalized harmonic number `H = Σ 1/i^s`. Rank 0
//! is the most frequent. A cumulative probability table is precomputed
//! at construction so each draw is a single binary search.

use crate::error::{DbPerfError, Result};

/// Immutable Zipf rank generator.
#[derive(Debug, Clone)]
pub struct ZipfianGenerator {
    skewness: f64,
    unique_count: usize,
    harmonic: f64,
    /// Monotonically increasing; last entry is ~1.0.
    cumulative: Vec<f64>,
}

impl ZipfianGenerator {
    /// Build a generator for `unique_count` ranks with the given skew.
    ///
    /// # Panics
    ///
    /// Panics if `skewness <= 0` or `unique_count == 0`.
    #[must_use]
    pub fn new(skewness: f64, unique_count: usize) -> Self {
        assert!(skewness > 0.0, "skewness must be positive");
        assert!(unique_count > 0, "unique_count must be positive");

        let harmonic: f64 = (1..=unique_count)
            .map(|i| 1.0 / (i as f64).powf(skewness))
            .sum();

        let mut cumulative = Vec::with_capacity(unique_count);
        let mut running = 0.0;
        for i in 1..=unique_count {
            running += (1.0 / (i as f64).powf(skewness)) / harmonic;
            cumulative.push(running);
        }

        Self {
            skewness,
            unique_count,
            harmonic,
            cumulative,
        }
    }

    /// Skewness parameter `s`.
    #[must_use]
    pub const fn skewness(&self) -> f64 {
        self.skewness
    }

    /// Number of distinct ranks.
    #[must_use]
    pub const fn unique_count(&self) -> usize {
        self.unique_count
    }

    /// Map a uniform draw in `[0, 1)` to a rank in `[0, unique_count)`.
    ///
    /// Binary search for the first cumulative entry `>= random`; ties
    /// resolve to the lower index.
    #[must_use]
    pub fn index_for(&self, random: f64) -> usize {
        let mut low = 0;
        let mut high = self.cumulative.len() - 1;
        while low < high {
            let mid = usize::midpoint(low, high);
            if self.cumulative[mid] < random {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        low
    }

    /// Pick a value from a pool sized exactly `unique_count`.
    ///
    /// # Errors
    ///
    /// Returns `ArityMismatch` when the pool size disagrees with the
    /// generator's unique count.
    pub fn pick<'a, T>(&self, values: &'a [T], random: f64) -> Result<&'a T> {
        if values.len() != self.unique_count {
            return Err(DbPerfError::ArityMismatch {
                expected: self.unique_count,
                actual: values.len(),
            });
        }
        Ok(&values[self.index_for(random)])
    }

    /// Analytically expected occurrence count per rank for `total`
    /// generated records. This is the oracle distribution tests check
    /// empirical frequencies against.
    #[must_use]
    pub fn expected_frequencies(&self, total: usize) -> Vec<u64> {
        (1..=self.unique_count)
            .map(|i| {
                let p = (1.0 / (i as f64).powf(self.skewness)) / self.harmonic;
                (p * total as f64).round() as u64
            })
            .collect()
    }
}
