//! Staged CRUD benchmark: engine, per-model generators, orchestrator.

pub mod engine;
pub mod generator;
pub mod orchestrator;

pub use engine::BenchmarkEngine;
pub use generator::{ComplexRecordGenerator, RecordGenerator, SimpleRecordGenerator};
pub use orchestrator::{DEFAULT_DATA_SIZES, StageOrchestrator};
