#![allow(dead_code)]

use dbperf::dataset::FixtureGenerator;
use dbperf::dataset::values::DEFAULT_SEED;
use dbperf::report::{EnvironmentInfo, EnvironmentProbe};
use std::path::PathBuf;
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        dbperf::logging::init_test_logging();
    });
}

/// Probe with fixed values so report assertions stay deterministic.
pub struct FixedProbe;

impl EnvironmentProbe for FixedProbe {
    fn collect(&self) -> EnvironmentInfo {
        EnvironmentInfo::unknown()
    }
}

/// Default-seed generator used across integration tests.
pub fn generator() -> FixtureGenerator {
    FixtureGenerator::new(DEFAULT_SEED)
}

/// A small flat fixture written into a fresh temp dir.
pub fn flat_fixture(count: usize) -> (TempDir, PathBuf) {
    init_test_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("flat.json");
    generator()
        .write_flat_fixture(&path, count)
        .expect("write fixture");
    (dir, path)
}

/// A small relational fixture written into a fresh temp dir.
pub fn relational_fixture(count: usize) -> (TempDir, PathBuf) {
    init_test_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("products.json");
    generator()
        .write_relational_fixture(&path, count)
        .expect("write fixture");
    (dir, path)
}
