//! Staged benchmark state machine.
//!
//! A run walks ascending dataset sizes through a fixed operation
//! sequence and assembles one [`BenchmarkResult`]. Any operation
//! failure is fatal to the run; cleanup is still attempted on the
//! failure path so stale backend state cannot leak into a later run,
//! and the original error is re-raised afterwards.

use crate::backend::{BackendAdapter, BackendOp};
use crate::bench::engine::BenchmarkEngine;
use crate::bench::generator::RecordGenerator;
use crate::error::{DbPerfError, Result};
use crate::report::{BenchmarkResult, EnvironmentProbe, RunMetadata, StageMeasurements, StageResult};
use tracing::{info, warn};

/// Default ascending dataset sizes.
pub const DEFAULT_DATA_SIZES: [usize; 3] = [1_000, 10_000, 100_000];

/// Repetitions for each search timing.
const SEARCH_ITERATIONS: usize = 10;

/// Upper bound on batch-create, read and update subsets.
const SUBSET_LIMIT: usize = 100;

/// Fan-out of the concurrency phase.
const CONCURRENT_OPS: usize = 10;

/// Drives one backend through all stages for one record model.
#[derive(Debug)]
pub struct StageOrchestrator<B: BackendAdapter, G> {
    engine: BenchmarkEngine<B>,
    generator: G,
    sizes: Vec<usize>,
}

impl<B, G> StageOrchestrator<B, G>
where
    B: BackendAdapter,
    G: RecordGenerator<Record = B::Record>,
{
    /// Orchestrator over the default stage sizes.
    #[must_use]
    pub fn new(backend: B, generator: G) -> Self {
        Self {
            engine: BenchmarkEngine::new(backend),
            generator,
            sizes: DEFAULT_DATA_SIZES.to_vec(),
        }
    }

    /// Orchestrator over custom stage sizes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidData` unless `sizes` is non-empty and strictly
    /// increasing.
    pub fn with_sizes(backend: B, generator: G, sizes: Vec<usize>) -> Result<Self> {
        if sizes.is_empty() || sizes.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(DbPerfError::invalid_data(format!(
                "stage sizes must be strictly increasing, got {sizes:?}"
            )));
        }
        Ok(Self {
            engine: BenchmarkEngine::new(backend),
            generator,
            sizes,
        })
    }

    /// Run every stage and assemble the result.
    ///
    /// # Errors
    ///
    /// Propagates the first operation failure after attempting
    /// best-effort cleanup.
    pub fn run(mut self, probe: &dyn EnvironmentProbe) -> Result<BenchmarkResult> {
        let database_name = self.engine.name().to_string();
        let database_version = self.engine.version().to_string();
        info!(
            backend = %database_name,
            model = self.generator.model_name(),
            sizes = ?self.sizes,
            "benchmark run starting"
        );

        let outcome = self.run_stages();

        // Teardown must not mask the run's own error.
        if let Err(cleanup_err) = self.engine.cleanup() {
            warn!(error = %cleanup_err, "cleanup failed");
        }

        let results = outcome?;
        info!(backend = %database_name, stages = results.len(), "benchmark run finished");
        Ok(BenchmarkResult {
            metadata: RunMetadata::new(&database_name, &database_version, probe.collect()),
            results,
        })
    }

    fn run_stages(&mut self) -> Result<Vec<StageResult>> {
        let initialization_ms = self.engine.time_initialize()?;
        let last_index = self.sizes.len() - 1;
        let sizes = self.sizes.clone();

        let mut stages = Vec::with_capacity(sizes.len());
        for (stage_index, &size) in sizes.iter().enumerate() {
            let first = stage_index == 0;
            let last = stage_index == last_index;
            let measurements = self.run_stage(size, first.then_some(initialization_ms), last)?;
            stages.push(StageResult {
                data_size: size,
                measurements,
            });
        }
        Ok(stages)
    }

    /// One `StageRunning(size)` pass through the operation sequence.
    fn run_stage(
        &mut self,
        size: usize,
        initialization: Option<f64>,
        last: bool,
    ) -> Result<StageMeasurements> {
        info!(size, "stage starting");

        // Only 10% of the prior stage's volume is assumed already
        // present, modeling amortized growth.
        let previous = if initialization.is_some() { 0 } else { size / 10 };
        let records: Vec<_> = (previous..size)
            .map(|i| self.generator.generate(&format!("id-{i}"), i))
            .collect();
        let create = self.engine.time_create(&records)?;
        self.engine.flush()?;

        let batch: Vec<_> = (0..SUBSET_LIMIT.min(records.len()))
            .map(|i| self.generator.generate_batch_record(&format!("batch-{size}-{i}")))
            .collect();
        let batch_create = self.engine.time_batch_create(&batch)?;

        let subset_ids: Vec<_> = (0..SUBSET_LIMIT.min(size))
            .map(|i| format!("id-{i}"))
            .collect();
        let read = self.engine.time_read(&subset_ids)?;

        let (indexed_field, indexed_value) = self.generator.indexed_probe();
        let indexed_search =
            self.engine
                .time_search_indexed(indexed_field, &indexed_value, SEARCH_ITERATIONS)?;

        let (plain_field, plain_value) = self.generator.non_indexed_probe();
        let non_indexed_search =
            self.engine
                .time_search_non_indexed(plain_field, &plain_value, SEARCH_ITERATIONS)?;

        let complex_query = self.engine.time_complex_query(SEARCH_ITERATIONS)?;

        let update = self
            .engine
            .time_update(&subset_ids, &self.generator.update_fields())?;

        let tx_id = format!("tx-{size}");
        let transaction = self.engine.time_transaction(&[
            BackendOp::Create(self.generator.generate(&tx_id, size)),
            BackendOp::Update {
                id: tx_id,
                fields: self.generator.transaction_update(),
            },
        ])?;

        let concurrent_ops: Vec<_> = (0..CONCURRENT_OPS)
            .map(|i| {
                BackendOp::Create(
                    self.generator
                        .generate_concurrent_record(&format!("concurrent-{size}-{i}")),
                )
            })
            .collect();
        let concurrency = self.engine.time_concurrent(concurrent_ops)?;
        self.engine.flush()?;

        // The final delete belongs to the last stage's record. It
        // removes every staged id one by one; the batch, transaction
        // and concurrency rows are swept by cleanup, not timed.
        let delete = if last {
            let staged_ids: Vec<_> = (0..size).map(|i| format!("id-{i}")).collect();
            let elapsed = self.engine.time_delete(&staged_ids)?;
            self.engine.flush()?;
            Some(elapsed)
        } else {
            None
        };

        Ok(StageMeasurements {
            initialization,
            create,
            batch_create,
            read,
            indexed_search,
            non_indexed_search,
            complex_query,
            update,
            transaction,
            concurrency,
            delete,
        })
    }
}
