//! Fixture file integrity: write/load round trips and the count
//! verification failure path.

mod common;

use common::{flat_fixture, init_test_logging, relational_fixture};
use dbperf::dataset::{load_flat_fixture, load_relational_fixture};
use dbperf::error::DbPerfError;
use std::fs;
use std::path::Path;

#[test]
fn flat_fixture_round_trips_field_for_field() {
    let (_dir, path) = flat_fixture(300);
    let loaded = load_flat_fixture(&path).unwrap();

    let regenerated = common::generator().generate_flat(300);
    assert_eq!(loaded.metadata.total_records, 300);
    assert_eq!(loaded.records, regenerated);
}

#[test]
fn relational_fixture_round_trips() {
    let (_dir, path) = relational_fixture(200);
    let loaded = load_relational_fixture(&path).unwrap();

    assert_eq!(loaded.metadata.total_records, 200);
    assert_eq!(loaded.products, common::generator().generate_products(200));
    for product in &loaded.products {
        assert!((1..=5).contains(&product.tags.len()));
    }
}

#[test]
fn metadata_carries_distribution_description() {
    let (_dir, path) = flat_fixture(50);
    let loaded = load_flat_fixture(&path).unwrap();
    assert_eq!(loaded.metadata.dataset_version, "1.0");
    assert!(!loaded.metadata.distribution.is_empty());
}

#[test]
fn tampered_count_fails_with_mismatch() {
    let (_dir, path) = flat_fixture(100);

    // Tamper with the declared total only.
    let text = fs::read_to_string(&path).unwrap();
    let tampered = text.replacen("\"totalRecords\": 100", "\"totalRecords\": 99", 1);
    assert_ne!(text, tampered, "tamper target not found");
    fs::write(&path, tampered).unwrap();

    let err = load_flat_fixture(&path).unwrap_err();
    assert!(matches!(
        err,
        DbPerfError::RecordCountMismatch {
            expected: 99,
            actual: 100
        }
    ));
}

#[test]
fn missing_fixture_reports_path() {
    init_test_logging();
    let err = load_flat_fixture(Path::new("/nonexistent/fixture.json")).unwrap_err();
    match err {
        DbPerfError::FixtureNotFound { path } => {
            assert_eq!(path, Path::new("/nonexistent/fixture.json"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_fixture_is_a_json_error() {
    let (_dir, path) = flat_fixture(10);
    fs::write(&path, "{ not json").unwrap();
    let err = load_flat_fixture(&path).unwrap_err();
    assert!(matches!(err, DbPerfError::Json(_)));
}
