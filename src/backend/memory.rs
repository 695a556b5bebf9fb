//! In-memory reference backend.
//!
//! Serves two purposes: a floor measurement for the staged benchmark
//! (every other backend's overhead is relative to a `BTreeMap`) and a
//! hermetic backend for tests. "Indexed" search here consults a
//! secondary map from field value to ids; non-indexed search scans.

use crate::backend::{BackendAdapter, BackendOp, SearchBackend};
use crate::error::{DbPerfError, Result};
use crate::model::{BenchRecord, FieldUpdate, FieldValue, FlatRecord, ProductRecord};
use crate::search::config::QueryParameters;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// In-memory CRUD backend over any benchmarkable record shape.
#[derive(Debug)]
pub struct MemoryBackend<R: BenchRecord> {
    name: String,
    records: BTreeMap<String, R>,
    /// Secondary index: field name -> value key -> record ids.
    index: HashMap<String, HashMap<String, Vec<String>>>,
    indexed_fields: Vec<&'static str>,
    complex_filter: fn(&R) -> bool,
    initialized: bool,
}

impl<R: BenchRecord> MemoryBackend<R> {
    /// Create a backend that indexes `indexed_fields` and answers the
    /// complex query with `complex_filter`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        indexed_fields: Vec<&'static str>,
        complex_filter: fn(&R) -> bool,
    ) -> Self {
        Self {
            name: name.into(),
            records: BTreeMap::new(),
            index: HashMap::new(),
            indexed_fields,
            complex_filter,
            initialized: false,
        }
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(DbPerfError::NotInitialized)
        }
    }

    fn index_key(value: &FieldValue) -> String {
        value.to_string()
    }

    fn index_record(&mut self, record: &R) {
        for field in &self.indexed_fields {
            if let Some(value) = record.field(field) {
                self.index
                    .entry((*field).to_string())
                    .or_default()
                    .entry(Self::index_key(&value))
                    .or_default()
                    .push(record.id().to_string());
            }
        }
    }

    fn unindex_record(&mut self, record: &R) {
        for field in &self.indexed_fields {
            if let Some(value) = record.field(field) {
                if let Some(by_value) = self.index.get_mut(*field) {
                    if let Some(ids) = by_value.get_mut(&Self::index_key(&value)) {
                        ids.retain(|id| id != record.id());
                    }
                }
            }
        }
    }

    fn apply_op(&mut self, op: &BackendOp<R>) -> Result<()> {
        match op {
            BackendOp::Create(record) => self.insert(record.clone()),
            BackendOp::Update { id, fields } => self.update_record(id, fields),
        }
    }

    fn insert(&mut self, record: R) -> Result<()> {
        self.index_record(&record);
        self.records.insert(record.id().to_string(), record);
        Ok(())
    }

    fn update_record(&mut self, id: &str, updates: &[FieldUpdate]) -> Result<()> {
        let mut record = self
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| DbPerfError::RecordNotFound { id: id.to_string() })?;
        self.unindex_record(&record);
        for update in updates {
            record.apply_update(update)?;
        }
        self.insert(record)
    }
}

impl<R: BenchRecord> BackendAdapter for MemoryBackend<R> {
    type Record = R;

    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        "in-memory"
    }

    fn initialize(&mut self) -> Result<()> {
        self.records.clear();
        self.index.clear();
        self.initialized = true;
        debug!(backend = %self.name, "memory backend initialized");
        Ok(())
    }

    fn create(&mut self, record: &R) -> Result<()> {
        self.ensure_initialized()?;
        self.insert(record.clone())
    }

    fn create_batch(&mut self, records: &[R]) -> Result<()> {
        self.ensure_initialized()?;
        for record in records {
            self.insert(record.clone())?;
        }
        Ok(())
    }

    fn read(&mut self, id: &str) -> Result<Option<R>> {
        self.ensure_initialized()?;
        Ok(self.records.get(id).cloned())
    }

    fn search_indexed(&mut self, field: &str, value: &FieldValue) -> Result<Vec<R>> {
        self.ensure_initialized()?;
        let Some(ids) = self
            .index
            .get(field)
            .and_then(|by_value| by_value.get(&Self::index_key(value)))
        else {
            return Ok(Vec::new());
        };
        Ok(ids
            .iter()
            .filter_map(|id| self.records.get(id).cloned())
            .collect())
    }

    fn search_non_indexed(&mut self, field: &str, value: &FieldValue) -> Result<Vec<R>> {
        self.ensure_initialized()?;
        Ok(self
            .records
            .values()
            .filter(|record| record.field(field).as_ref() == Some(value))
            .cloned()
            .collect())
    }

    fn complex_query(&mut self) -> Result<Vec<R>> {
        self.ensure_initialized()?;
        Ok(self
            .records
            .values()
            .filter(|record| (self.complex_filter)(record))
            .cloned()
            .collect())
    }

    fn update(&mut self, id: &str, updates: &[FieldUpdate]) -> Result<()> {
        self.ensure_initialized()?;
        self.update_record(id, updates)
    }

    fn execute_transaction(&mut self, ops: &[BackendOp<R>]) -> Result<()> {
        self.ensure_initialized()?;
        // Snapshot-rollback gives the map transactional semantics.
        let records = self.records.clone();
        let index = self.index.clone();
        for op in ops {
            if let Err(err) = self.apply_op(op) {
                self.records = records;
                self.index = index;
                return Err(err);
            }
        }
        Ok(())
    }

    fn execute_concurrent(&mut self, ops: Vec<BackendOp<R>>) -> Result<()> {
        self.ensure_initialized()?;
        for op in &ops {
            self.apply_op(op)?;
        }
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.ensure_initialized()?;
        if let Some(record) = self.records.remove(id) {
            self.unindex_record(&record);
        }
        Ok(())
    }

    fn delete_all(&mut self) -> Result<()> {
        self.ensure_initialized()?;
        self.records.clear();
        self.index.clear();
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        self.records.clear();
        self.index.clear();
        self.initialized = false;
        Ok(())
    }
}

/// Which fixture shape a [`MemorySearchBackend`] holds.
enum SearchData {
    Flat(Vec<FlatRecord>),
    Products(Vec<ProductRecord>),
}

/// In-memory search backend over a loaded fixture.
pub struct MemorySearchBackend {
    name: String,
    data: SearchData,
}

impl MemorySearchBackend {
    /// Serve the flat scenarios from flat fixture records.
    #[must_use]
    pub fn from_flat(name: impl Into<String>, records: Vec<FlatRecord>) -> Self {
        Self {
            name: name.into(),
            data: SearchData::Flat(records),
        }
    }

    /// Serve all scenarios, including relational ones, from tagged
    /// product records.
    #[must_use]
    pub fn from_products(name: impl Into<String>, products: Vec<ProductRecord>) -> Self {
        Self {
            name: name.into(),
            data: SearchData::Products(products),
        }
    }

    fn matches_flat(record: &FlatRecord, params: &QueryParameters) -> bool {
        if let Some(name) = &params.name {
            if record.name != *name {
                return false;
            }
        }
        if let Some(category) = &params.category {
            if record.category != *category {
                return false;
            }
        }
        if let Some(min) = params.price_min {
            if record.price < min {
                return false;
            }
        }
        if let Some(max) = params.price_max {
            if record.price > max {
                return false;
            }
        }
        if let Some(from) = params.date_from {
            if record.date < from {
                return false;
            }
        }
        if let Some(keyword) = &params.keyword {
            if !record.description.contains(keyword.as_str()) {
                return false;
            }
        }
        true
    }

    fn matches_product(record: &ProductRecord, params: &QueryParameters) -> bool {
        if let Some(name) = &params.name {
            if record.name != *name {
                return false;
            }
        }
        if let Some(category) = &params.category {
            if record.category != *category {
                return false;
            }
        }
        if let Some(min) = params.price_min {
            if record.price < min {
                return false;
            }
        }
        if let Some(max) = params.price_max {
            if record.price > max {
                return false;
            }
        }
        if let Some(from) = params.date_from {
            if record.date < from {
                return false;
            }
        }
        if let Some(keyword) = &params.keyword {
            if !record.description.contains(keyword.as_str()) {
                return false;
            }
        }
        if let Some(tag) = &params.tag {
            if !record.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        if let Some(tags) = &params.tags {
            if !tags.iter().all(|tag| record.tags.iter().any(|t| t == tag)) {
                return false;
            }
        }
        true
    }
}

impl SearchBackend for MemorySearchBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        "in-memory"
    }

    fn indexed(&self) -> bool {
        false
    }

    fn search(&self, params: &QueryParameters) -> Result<usize> {
        match &self.data {
            SearchData::Flat(records) => {
                if params.tag.is_some() || params.tags.is_some() {
                    return Err(DbPerfError::invalid_data(
                        "tag query against a flat fixture",
                    ));
                }
                Ok(records
                    .iter()
                    .filter(|r| Self::matches_flat(r, params))
                    .count())
            }
            SearchData::Products(products) => Ok(products
                .iter()
                .filter(|p| Self::matches_product(p, params))
                .count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SimpleRecord;
    use crate::search::config::SearchScenario;
    use chrono::Utc;

    fn backend() -> MemoryBackend<SimpleRecord> {
        let mut backend = MemoryBackend::new(
            "memory",
            vec!["age"],
            |r: &SimpleRecord| r.is_active && r.age > 30,
        );
        backend.initialize().unwrap();
        backend
    }

    fn record(id: &str, age: i64) -> SimpleRecord {
        SimpleRecord {
            id: id.to_string(),
            name: format!("Name {age}"),
            age,
            score: 50.0,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn rejects_use_before_initialize() {
        let mut backend: MemoryBackend<SimpleRecord> =
            MemoryBackend::new("memory", vec![], |_| true);
        let err = backend.read("id-0").unwrap_err();
        assert!(matches!(err, DbPerfError::NotInitialized));
    }

    #[test]
    fn crud_round_trip() {
        let mut backend = backend();
        backend.create(&record("id-1", 25)).unwrap();
        assert_eq!(backend.read("id-1").unwrap().unwrap().age, 25);

        backend
            .update("id-1", &[FieldUpdate::new("age", 35i64)])
            .unwrap();
        assert_eq!(backend.read("id-1").unwrap().unwrap().age, 35);

        backend.delete("id-1").unwrap();
        assert!(backend.read("id-1").unwrap().is_none());
    }

    #[test]
    fn indexed_search_tracks_updates() {
        let mut backend = backend();
        backend.create(&record("id-1", 25)).unwrap();
        backend.create(&record("id-2", 25)).unwrap();

        let hits = backend
            .search_indexed("age", &FieldValue::Int(25))
            .unwrap();
        assert_eq!(hits.len(), 2);

        backend
            .update("id-1", &[FieldUpdate::new("age", 40i64)])
            .unwrap();
        let hits = backend
            .search_indexed("age", &FieldValue::Int(25))
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "id-2");
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let mut backend = backend();
        backend.create(&record("id-1", 25)).unwrap();

        let ops = vec![
            BackendOp::Create(record("id-2", 30)),
            BackendOp::Update {
                id: "missing".to_string(),
                fields: vec![FieldUpdate::new("age", 1i64)],
            },
        ];
        assert!(backend.execute_transaction(&ops).is_err());
        assert!(backend.read("id-2").unwrap().is_none());
        assert!(backend.read("id-1").unwrap().is_some());
    }

    #[test]
    fn update_missing_record_fails() {
        let mut backend = backend();
        let err = backend
            .update("missing", &[FieldUpdate::new("age", 1i64)])
            .unwrap_err();
        assert!(matches!(err, DbPerfError::RecordNotFound { .. }));
    }

    #[test]
    fn flat_search_rejects_tag_queries() {
        let search = MemorySearchBackend::from_flat("memory", Vec::new());
        let params = SearchScenario::TagEquality.query_params();
        assert!(search.search(&params).is_err());
    }

    #[test]
    fn product_search_applies_all_predicates() {
        let product = ProductRecord {
            id: "PROD-000001".to_string(),
            name: "Product-AA".to_string(),
            category: "Electronics".to_string(),
            price: 3000,
            date: Utc::now(),
            description: "premium build quality".to_string(),
            is_active: true,
            tags: vec!["new-tech".to_string(), "smart-device".to_string()],
        };
        let search = MemorySearchBackend::from_products("memory", vec![product]);

        let mut params = QueryParameters {
            price_min: Some(1000),
            price_max: Some(5000),
            tag: Some("new-tech".to_string()),
            ..QueryParameters::default()
        };
        assert_eq!(search.search(&params).unwrap(), 1);

        params.price_max = Some(2000);
        assert_eq!(search.search(&params).unwrap(), 0);
    }
}
