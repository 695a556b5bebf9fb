//! Per-model record generation for the staged benchmark.
//!
//! Unlike the fixture generator, these records are plain and
//! index-derived: the benchmark measures backend operation cost, not
//! distribution realism, so values only need to be deterministic and
//! cheap to produce.

use crate::model::{
    BenchRecord, ComplexRecord, FieldUpdate, FieldValue, Level2, Level3, Level4, Level5,
    SimpleRecord,
};
use chrono::Utc;

/// Everything an orchestrator needs to know about one record model.
pub trait RecordGenerator {
    type Record: BenchRecord;

    /// Model label for log lines.
    fn model_name(&self) -> &'static str;

    /// Record for the incremental create phase.
    fn generate(&self, id: &str, index: usize) -> Self::Record;

    /// Record for the batch create phase.
    fn generate_batch_record(&self, id: &str) -> Self::Record;

    /// Record for the concurrency phase.
    fn generate_concurrent_record(&self, id: &str) -> Self::Record;

    /// Field updates applied during the update phase.
    fn update_fields(&self) -> Vec<FieldUpdate>;

    /// Field updates applied inside the transaction phase.
    fn transaction_update(&self) -> Vec<FieldUpdate>;

    /// Field and value for the indexed search phase.
    fn indexed_probe(&self) -> (&'static str, FieldValue);

    /// Field and value for the non-indexed search phase.
    fn non_indexed_probe(&self) -> (&'static str, FieldValue);
}

/// Generator for the five-field simple model.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleRecordGenerator;

impl RecordGenerator for SimpleRecordGenerator {
    type Record = SimpleRecord;

    fn model_name(&self) -> &'static str {
        "simple"
    }

    fn generate(&self, id: &str, index: usize) -> SimpleRecord {
        SimpleRecord {
            id: id.to_string(),
            name: format!("Name {index}"),
            age: 20 + (index as i64 % 60),
            score: (index % 100) as f64,
            is_active: index % 2 == 0,
            created_at: Utc::now(),
        }
    }

    fn generate_batch_record(&self, id: &str) -> SimpleRecord {
        SimpleRecord {
            id: id.to_string(),
            name: "Batch".to_string(),
            age: 25,
            score: 75.0,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn generate_concurrent_record(&self, id: &str) -> SimpleRecord {
        SimpleRecord {
            id: id.to_string(),
            name: "Concurrent".to_string(),
            age: 25,
            score: 50.0,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn update_fields(&self) -> Vec<FieldUpdate> {
        vec![FieldUpdate::new("age", 35i64)]
    }

    fn transaction_update(&self) -> Vec<FieldUpdate> {
        vec![FieldUpdate::new("age", 41i64)]
    }

    fn indexed_probe(&self) -> (&'static str, FieldValue) {
        ("age", FieldValue::Int(30))
    }

    fn non_indexed_probe(&self) -> (&'static str, FieldValue) {
        ("name", FieldValue::Text("Name 100".to_string()))
    }
}

/// Generator for the five-level nested model.
///
/// Fan-out is bounded (at most 3 children at the top level) and
/// shrinks deterministically with the generating index, so deep trees
/// stay cheap while still exercising nested encode paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComplexRecordGenerator;

impl ComplexRecordGenerator {
    fn children(id: &str, index: usize) -> Vec<Level2> {
        let level2_count = index % 3 + 1;
        (0..level2_count)
            .map(|i| Level2 {
                id: format!("{id}-l2-{i}"),
                title: format!("Title {i}"),
                count: (index + i) as i64,
                children: Self::level3(id, index, i),
            })
            .collect()
    }

    fn level3(id: &str, index: usize, parent: usize) -> Vec<Level3> {
        let count = index % 2 + 1;
        (0..count)
            .map(|i| Level3 {
                id: format!("{id}-l3-{parent}-{i}"),
                label: format!("Label {i}"),
                amount: (index % 50) as f64,
                children: vec![Level4 {
                    id: format!("{id}-l4-{parent}-{i}"),
                    description: "Nested".to_string(),
                    quantity: i as i64,
                    children: vec![Level5 {
                        id: format!("{id}-l5-{parent}-{i}"),
                        note: "Leaf".to_string(),
                        index: index as i64,
                    }],
                }],
            })
            .collect()
    }
}

impl RecordGenerator for ComplexRecordGenerator {
    type Record = ComplexRecord;

    fn model_name(&self) -> &'static str {
        "complex"
    }

    fn generate(&self, id: &str, index: usize) -> ComplexRecord {
        ComplexRecord {
            id: id.to_string(),
            name: format!("Complex {index}"),
            value: index as i64,
            score: (index % 100) as f64,
            is_enabled: index % 2 == 0,
            timestamp: Utc::now(),
            children: Self::children(id, index),
        }
    }

    fn generate_batch_record(&self, id: &str) -> ComplexRecord {
        ComplexRecord {
            id: id.to_string(),
            name: "Batch".to_string(),
            value: 75,
            score: 75.0,
            is_enabled: true,
            timestamp: Utc::now(),
            children: Vec::new(),
        }
    }

    fn generate_concurrent_record(&self, id: &str) -> ComplexRecord {
        ComplexRecord {
            id: id.to_string(),
            name: "Concurrent".to_string(),
            value: 50,
            score: 50.0,
            is_enabled: true,
            timestamp: Utc::now(),
            children: Vec::new(),
        }
    }

    fn update_fields(&self) -> Vec<FieldUpdate> {
        vec![FieldUpdate::new("value", 999i64)]
    }

    fn transaction_update(&self) -> Vec<FieldUpdate> {
        vec![FieldUpdate::new("value", 888i64)]
    }

    fn indexed_probe(&self) -> (&'static str, FieldValue) {
        ("value", FieldValue::Int(500))
    }

    fn non_indexed_probe(&self) -> (&'static str, FieldValue) {
        ("name", FieldValue::Text("Complex 100".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_fields_derive_from_index() {
        let record = SimpleRecordGenerator.generate("id-7", 7);
        assert_eq!(record.id, "id-7");
        assert_eq!(record.name, "Name 7");
        assert_eq!(record.age, 27);
        assert!(!record.is_active);
    }

    #[test]
    fn complex_fan_out_is_bounded() {
        for index in 0..50 {
            let record = ComplexRecordGenerator.generate("id", index);
            assert!((1..=3).contains(&record.children.len()));
            for level2 in &record.children {
                assert!((1..=2).contains(&level2.children.len()));
                for level3 in &level2.children {
                    assert_eq!(level3.children.len(), 1);
                    assert_eq!(level3.children[0].children.len(), 1);
                }
            }
        }
    }

    #[test]
    fn update_fields_match_model_schema() {
        let mut record = SimpleRecordGenerator.generate("id-0", 0);
        for update in SimpleRecordGenerator.update_fields() {
            record.apply_update(&update).unwrap();
        }
        assert_eq!(record.age, 35);

        let mut record = ComplexRecordGenerator.generate("id-0", 0);
        for update in ComplexRecordGenerator.update_fields() {
            record.apply_update(&update).unwrap();
        }
        assert_eq!(record.value, 999);
    }
}
