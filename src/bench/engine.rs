//! Wall-clock measurement around backend operations.
//!
//! The engine times exactly one invocation per call and never retries:
//! a retry would corrupt the performance signal, so a failure inside a
//! measured operation propagates immediately and aborts that
//! measurement.

use crate::backend::{BackendAdapter, BackendOp};
use crate::error::Result;
use crate::model::{FieldUpdate, FieldValue};
use std::time::Instant;
use tracing::trace;

/// Timing wrapper over a backend.
#[derive(Debug)]
pub struct BenchmarkEngine<B: BackendAdapter> {
    backend: B,
}

impl<B: BackendAdapter> BenchmarkEngine<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.backend.name()
    }

    #[must_use]
    pub fn version(&self) -> &str {
        self.backend.version()
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Time one operation against the backend, in milliseconds.
    ///
    /// # Errors
    ///
    /// Propagates the operation's error; the elapsed time of a failed
    /// operation is discarded.
    pub fn measure<T>(&mut self, op: impl FnOnce(&mut B) -> Result<T>) -> Result<f64> {
        let start = Instant::now();
        op(&mut self.backend)?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        trace!(elapsed_ms, "operation measured");
        Ok(elapsed_ms)
    }

    /// Time backend initialization.
    pub fn time_initialize(&mut self) -> Result<f64> {
        self.measure(B::initialize)
    }

    /// Time creating each record individually.
    pub fn time_create(&mut self, records: &[B::Record]) -> Result<f64> {
        self.measure(|backend| {
            for record in records {
                backend.create(record)?;
            }
            Ok(())
        })
    }

    /// Time one bulk insert.
    pub fn time_batch_create(&mut self, records: &[B::Record]) -> Result<f64> {
        self.measure(|backend| backend.create_batch(records))
    }

    /// Time reading each id individually.
    pub fn time_read(&mut self, ids: &[String]) -> Result<f64> {
        self.measure(|backend| {
            for id in ids {
                backend.read(id)?;
            }
            Ok(())
        })
    }

    /// Time `iterations` repetitions of an indexed equality search.
    pub fn time_search_indexed(
        &mut self,
        field: &str,
        value: &FieldValue,
        iterations: usize,
    ) -> Result<f64> {
        self.measure(|backend| {
            for _ in 0..iterations {
                backend.search_indexed(field, value)?;
            }
            Ok(())
        })
    }

    /// Time `iterations` repetitions of a non-indexed equality search.
    pub fn time_search_non_indexed(
        &mut self,
        field: &str,
        value: &FieldValue,
        iterations: usize,
    ) -> Result<f64> {
        self.measure(|backend| {
            for _ in 0..iterations {
                backend.search_non_indexed(field, value)?;
            }
            Ok(())
        })
    }

    /// Time `iterations` repetitions of the backend's complex query.
    pub fn time_complex_query(&mut self, iterations: usize) -> Result<f64> {
        self.measure(|backend| {
            for _ in 0..iterations {
                backend.complex_query()?;
            }
            Ok(())
        })
    }

    /// Time updating each id individually.
    pub fn time_update(&mut self, ids: &[String], updates: &[FieldUpdate]) -> Result<f64> {
        self.measure(|backend| {
            for id in ids {
                backend.update(id, updates)?;
            }
            Ok(())
        })
    }

    /// Time one atomic transaction.
    pub fn time_transaction(&mut self, ops: &[BackendOp<B::Record>]) -> Result<f64> {
        self.measure(|backend| backend.execute_transaction(ops))
    }

    /// Time a set of independent operations issued as one unit.
    pub fn time_concurrent(&mut self, ops: Vec<BackendOp<B::Record>>) -> Result<f64> {
        self.measure(|backend| backend.execute_concurrent(ops))
    }

    /// Time deleting each id individually.
    pub fn time_delete(&mut self, ids: &[String]) -> Result<f64> {
        self.measure(|backend| {
            for id in ids {
                backend.delete(id)?;
            }
            Ok(())
        })
    }

    /// Flush outside any timing window.
    pub fn flush(&mut self) -> Result<()> {
        self.backend.flush()
    }

    /// Tear the backend down.
    pub fn cleanup(&mut self) -> Result<()> {
        self.backend.cleanup()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::error::DbPerfError;
    use crate::model::SimpleRecord;
    use chrono::Utc;

    fn engine() -> BenchmarkEngine<MemoryBackend<SimpleRecord>> {
        BenchmarkEngine::new(MemoryBackend::new("memory", vec!["age"], |_| true))
    }

    fn record(id: &str) -> SimpleRecord {
        SimpleRecord {
            id: id.to_string(),
            name: "Name".to_string(),
            age: 25,
            score: 50.0,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn measure_returns_nonnegative_elapsed() {
        let mut engine = engine();
        let elapsed = engine.time_initialize().unwrap();
        assert!(elapsed >= 0.0);
    }

    #[test]
    fn failure_aborts_measurement() {
        let mut engine = engine();
        // Not initialized, so the first create fails and propagates.
        let err = engine.time_create(&[record("id-0")]).unwrap_err();
        assert!(matches!(err, DbPerfError::NotInitialized));
    }

    #[test]
    fn delete_timing_removes_only_the_given_ids() {
        let mut engine = engine();
        engine.time_initialize().unwrap();
        engine.time_create(&[record("id-0"), record("id-1")]).unwrap();
        engine.time_delete(&["id-0".to_string()]).unwrap();
        assert!(engine.backend_mut().read("id-0").unwrap().is_none());
        assert!(engine.backend_mut().read("id-1").unwrap().is_some());
    }

    #[test]
    fn timed_operations_take_effect() {
        let mut engine = engine();
        engine.time_initialize().unwrap();
        engine.time_create(&[record("id-0"), record("id-1")]).unwrap();
        engine
            .time_update(
                &["id-0".to_string()],
                &[FieldUpdate::new("age", 35i64)],
            )
            .unwrap();
        let loaded = engine.backend_mut().read("id-0").unwrap().unwrap();
        assert_eq!(loaded.age, 35);
    }
}
