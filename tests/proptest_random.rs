//! Property-based tests for the seeded random stream and the Zipf
//! mapping.
//!
//! Uses proptest to verify that:
//! - Outputs stay inside their contractual ranges for any seed
//! - Restarting from the same seed replays the exact sequence
//! - The Zipf index never escapes `[0, uniqueCount)`

use dbperf::dataset::{SeededRandom, ZipfianGenerator};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 100,
        ..Default::default()
    })]

    #[test]
    fn next_f64_stays_in_unit_interval(seed in any::<u64>()) {
        let mut rng = SeededRandom::new(seed);
        for _ in 0..200 {
            let value = rng.next_f64();
            prop_assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn next_int_respects_bounds(seed in any::<u64>(), low in -1000i64..1000, span in 1i64..10_000) {
        let mut rng = SeededRandom::new(seed);
        let high = low + span;
        for _ in 0..50 {
            let value = rng.next_int(low, high);
            prop_assert!((low..high).contains(&value));
        }
    }

    #[test]
    fn same_seed_replays_sequence(seed in any::<u64>()) {
        let mut a = SeededRandom::new(seed);
        let mut b = SeededRandom::new(seed);
        for _ in 0..100 {
            prop_assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn zipf_index_stays_in_range(
        seed in any::<u64>(),
        unique_count in 1usize..500,
        skew in 0.1f64..3.0,
    ) {
        let zipf = ZipfianGenerator::new(skew, unique_count);
        let mut rng = SeededRandom::new(seed);
        for _ in 0..100 {
            let index = zipf.index_for(rng.next_f64());
            prop_assert!(index < unique_count);
        }
    }

    #[test]
    fn zipf_frequencies_sum_to_total(total in 1usize..1_000_000) {
        let zipf = ZipfianGenerator::new(1.3, 100);
        let sum: u64 = zipf.expected_frequencies(total).iter().sum();
        // Rounding may shift the sum by at most one per rank.
        let diff = (sum as i64 - total as i64).unsigned_abs();
        prop_assert!(diff <= 100, "sum {sum} vs total {total}");
    }
}
