//! Database CRUD and search benchmark harness.
//!
//! Deterministic synthetic datasets (seeded LCG + Zipfian skew) feed a
//! staged CRUD benchmark and a fixed set of search scenarios, both of
//! which emit comparable JSON report artifacts.

pub mod backend;
pub mod bench;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod model;
pub mod report;
pub mod search;
pub mod util;

pub use error::{DbPerfError, Result};
