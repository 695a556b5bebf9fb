//! Full orchestrator runs against real backends (no mocks), checking
//! the staging invariants and the saved artifact.

mod common;

use common::{FixedProbe, init_test_logging};
use dbperf::backend::{MemoryBackend, SqliteBackend};
use dbperf::bench::{ComplexRecordGenerator, SimpleRecordGenerator, StageOrchestrator};
use dbperf::model::{ComplexRecord, SimpleRecord};
use dbperf::report::BenchmarkResult;

fn memory_backend() -> MemoryBackend<SimpleRecord> {
    MemoryBackend::new("memory", vec!["age"], |r: &SimpleRecord| {
        r.is_active && r.age > 30
    })
}

#[test]
fn sqlite_run_covers_every_operation() {
    init_test_logging();
    let orchestrator = StageOrchestrator::with_sizes(
        SqliteBackend::in_memory(),
        SimpleRecordGenerator,
        vec![100, 400],
    )
    .unwrap();
    let result = orchestrator.run(&FixedProbe).unwrap();

    assert_eq!(result.metadata.database_name, "sqlite-memory");
    assert!(!result.metadata.database_version.is_empty());
    for stage in &result.results {
        let m = &stage.measurements;
        for elapsed in [
            m.create,
            m.batch_create,
            m.read,
            m.indexed_search,
            m.non_indexed_search,
            m.complex_query,
            m.update,
            m.transaction,
            m.concurrency,
        ] {
            assert!(elapsed >= 0.0);
        }
    }
}

#[test]
fn stage_sizes_are_strictly_increasing_in_report() {
    init_test_logging();
    let orchestrator = StageOrchestrator::with_sizes(
        memory_backend(),
        SimpleRecordGenerator,
        vec![100, 300, 900],
    )
    .unwrap();
    let result = orchestrator.run(&FixedProbe).unwrap();

    let sizes: Vec<_> = result.results.iter().map(|s| s.data_size).collect();
    assert_eq!(sizes, vec![100, 300, 900]);
    assert!(sizes.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn initialization_and_delete_attribution() {
    init_test_logging();
    let orchestrator = StageOrchestrator::with_sizes(
        memory_backend(),
        SimpleRecordGenerator,
        vec![100, 300, 900],
    )
    .unwrap();
    let result = orchestrator.run(&FixedProbe).unwrap();

    for (index, stage) in result.results.iter().enumerate() {
        assert_eq!(
            stage.measurements.initialization.is_some(),
            index == 0,
            "initialization belongs to the first stage only"
        );
        assert_eq!(
            stage.measurements.delete.is_some(),
            index == result.results.len() - 1,
            "delete belongs to the last stage only"
        );
    }
}

#[test]
fn complex_model_runs_on_memory_backend() {
    init_test_logging();
    let backend: MemoryBackend<ComplexRecord> =
        MemoryBackend::new("memory", vec!["value"], |r: &ComplexRecord| {
            r.is_enabled && r.value > 50
        });
    let orchestrator =
        StageOrchestrator::with_sizes(backend, ComplexRecordGenerator, vec![50, 200]).unwrap();
    let result = orchestrator.run(&FixedProbe).unwrap();
    assert_eq!(result.results.len(), 2);
}

#[test]
fn artifact_survives_save_and_load() {
    init_test_logging();
    let orchestrator =
        StageOrchestrator::with_sizes(memory_backend(), SimpleRecordGenerator, vec![100])
            .unwrap();
    let result = orchestrator.run(&FixedProbe).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = result.save(dir.path()).unwrap();
    let loaded = BenchmarkResult::load(&path).unwrap();

    assert_eq!(loaded.metadata.database_name, "memory");
    assert_eq!(loaded.results.len(), 1);
    assert_eq!(loaded.results[0].data_size, 100);
    // Single stage is both first and last.
    assert!(loaded.results[0].measurements.initialization.is_some());
    assert!(loaded.results[0].measurements.delete.is_some());
}
