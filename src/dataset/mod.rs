//! Deterministic synthetic dataset generation.
//!
//! Layered leaves-first: [`random`] provides the seeded stream,
//! [`zipf`] maps uniform draws to skewed ranks, [`values`] holds the
//! finite pools and constants, and [`fixture`] assembles complete
//! records and the portable fixture format.

pub mod fixture;
pub mod random;
pub mod values;
pub mod zipf;

pub use fixture::{
    FixtureFile, FixtureGenerator, FixtureMetadata, RelationalFixtureFile, load_flat_fixture,
    load_relational_fixture,
};
pub use random::SeededRandom;
pub use zipf::ZipfianGenerator;
