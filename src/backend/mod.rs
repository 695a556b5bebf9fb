//! Backend abstraction the benchmark drives.
//!
//! [`BackendAdapter`] is the CRUD capability surface a database must
//! expose to be benchmarked; [`SearchBackend`] is the narrower
//! read-only surface the search scenarios need. Both are object-safe
//! enough for the orchestrators yet strongly typed over the record
//! shape they store.

pub mod memory;
pub mod sqlite;

pub use memory::{MemoryBackend, MemorySearchBackend};
pub use sqlite::{SqliteBackend, SqliteSearchBackend};

use crate::error::Result;
use crate::model::{BenchRecord, FieldUpdate};
use crate::search::config::QueryParameters;

/// One operation inside a transaction or concurrency batch.
///
/// A closed set of variants rather than opaque closures: backends can
/// translate each operation into their native write path (a SQL
/// statement, a map mutation) without executing arbitrary code inside
/// their transaction scope.
#[derive(Debug, Clone)]
pub enum BackendOp<R> {
    /// Insert a new record.
    Create(R),
    /// Apply field updates to an existing record.
    Update {
        id: String,
        fields: Vec<FieldUpdate>,
    },
}

/// Full CRUD capability surface for the staged benchmark.
///
/// Every method except `initialize` must return
/// [`DbPerfError::NotInitialized`](crate::error::DbPerfError::NotInitialized)
/// when called before `initialize` succeeded.
pub trait BackendAdapter {
    /// Record shape this backend stores.
    type Record: BenchRecord;

    /// Backend display name, used in report metadata and filenames.
    fn name(&self) -> &str;

    /// Backend version string for report metadata.
    fn version(&self) -> &str;

    /// Prepare storage (open connections, create schema).
    fn initialize(&mut self) -> Result<()>;

    /// Insert one record.
    fn create(&mut self, record: &Self::Record) -> Result<()>;

    /// Insert many records through the backend's bulk path.
    fn create_batch(&mut self, records: &[Self::Record]) -> Result<()>;

    /// Fetch a record by id; `Ok(None)` when absent.
    fn read(&mut self, id: &str) -> Result<Option<Self::Record>>;

    /// Equality search over a field the backend indexes.
    fn search_indexed(&mut self, field: &str, value: &crate::model::FieldValue)
    -> Result<Vec<Self::Record>>;

    /// Equality search over a field the backend does not index.
    fn search_non_indexed(
        &mut self,
        field: &str,
        value: &crate::model::FieldValue,
    ) -> Result<Vec<Self::Record>>;

    /// The backend's canonical multi-predicate query for this record
    /// shape (range + filter + ordering).
    fn complex_query(&mut self) -> Result<Vec<Self::Record>>;

    /// Apply field updates to a record by id.
    ///
    /// Must fail with `RecordNotFound` when the id is absent.
    fn update(&mut self, id: &str, updates: &[FieldUpdate]) -> Result<()>;

    /// Execute a batch of operations atomically.
    fn execute_transaction(&mut self, ops: &[BackendOp<Self::Record>]) -> Result<()>;

    /// Execute a batch of independent operations; all must have
    /// completed (or failed) before this returns.
    fn execute_concurrent(&mut self, ops: Vec<BackendOp<Self::Record>>) -> Result<()>;

    /// Delete a record by id. Deleting an absent id is not an error.
    fn delete(&mut self, id: &str) -> Result<()>;

    /// Delete every record.
    fn delete_all(&mut self) -> Result<()>;

    /// Release resources and remove leftover data. Must be safe to
    /// call at any point, including after a failed stage.
    fn cleanup(&mut self) -> Result<()>;

    /// Force buffered writes to storage. Backends without a buffer
    /// keep the default no-op.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Read-only surface for the search scenario runner.
///
/// Returns the match count rather than materialized records so the
/// runner stays independent of the backend's record shape.
pub trait SearchBackend {
    /// Backend display name for report metadata.
    fn name(&self) -> &str;

    /// Backend version string for report metadata.
    fn version(&self) -> &str;

    /// Whether the fields the scenarios filter on are indexed here.
    fn indexed(&self) -> bool;

    /// Count records matching every populated parameter.
    fn search(&self, params: &QueryParameters) -> Result<usize>;
}
