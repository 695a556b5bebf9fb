//! Record shapes generated by the dataset layer and exercised by the
//! benchmark backends.
//!
//! Three families:
//! - `FlatRecord` / `ProductRecord`: fixture records with controlled
//!   statistical distributions, used by the search scenarios.
//! - `SimpleRecord` / `ComplexRecord`: per-stage benchmark records
//!   produced incrementally during CRUD runs.
//!
//! Field updates travel as a closed tagged variant (`FieldValue`)
//! keyed by field name; backends validate names and types against the
//! record schema at the call site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flat fixture record: one table row, no relations.
///
/// `name` and `category` follow Zipf distributions and are the indexed
/// fields; `price` and `date` are uniform; `description` is
/// mixed-length text for full-text scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: i64,
    pub date: DateTime<Utc>,
    pub description: String,
    pub is_active: bool,
}

/// Product record: a flat record plus a 1:N tag list (1-5 distinct
/// tags from a 200-entry pool, mean ~2.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: i64,
    pub date: DateTime<Utc>,
    pub description: String,
    pub is_active: bool,
    pub tags: Vec<String>,
}

/// Standalone tag entity for fixtures that carry tags separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub tag_name: String,
    pub created_at: DateTime<Utc>,
}

/// Simple benchmark record: five scalar fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleRecord {
    pub id: String,
    pub name: String,
    pub age: i64,
    pub score: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Complex benchmark record: a root with four owned child levels.
///
/// Each level adds one scalar field; fan-out is bounded and shrinks
/// deterministically with the generating index. No back-references, so
/// plain ownership is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexRecord {
    pub id: String,
    pub name: String,
    pub value: i64,
    pub score: f64,
    pub is_enabled: bool,
    pub timestamp: DateTime<Utc>,
    pub children: Vec<Level2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level2 {
    pub id: String,
    pub title: String,
    pub count: i64,
    pub children: Vec<Level3>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level3 {
    pub id: String,
    pub label: String,
    pub amount: f64,
    pub children: Vec<Level4>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level4 {
    pub id: String,
    pub description: String,
    pub quantity: i64,
    pub children: Vec<Level5>,
}

/// Deepest level; leaf only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level5 {
    pub id: String,
    pub note: String,
    pub index: i64,
}

/// Closed value variant for field updates and search probes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Double(d) => write!(f, "{d}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// A single named field update.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    pub field: String,
    pub value: FieldValue,
}

impl FieldUpdate {
    #[must_use]
    pub fn new(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Common surface every benchmarkable record exposes.
pub trait BenchRecord: Clone + Send + 'static {
    /// Stable primary key.
    fn id(&self) -> &str;

    /// Apply a validated field update in place.
    ///
    /// # Errors
    ///
    /// Returns `InvalidData` for unknown fields or type mismatches.
    fn apply_update(&mut self, update: &FieldUpdate) -> crate::error::Result<()>;

    /// Read a field by its wire name; `None` for unknown fields.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

fn type_mismatch(field: &str, value: &FieldValue) -> crate::error::DbPerfError {
    crate::error::DbPerfError::invalid_data(format!(
        "type mismatch for field '{field}': got {value:?}"
    ))
}

fn unknown_field(field: &str) -> crate::error::DbPerfError {
    crate::error::DbPerfError::invalid_data(format!("unknown field '{field}'"))
}

impl BenchRecord for SimpleRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn apply_update(&mut self, update: &FieldUpdate) -> crate::error::Result<()> {
        match (update.field.as_str(), &update.value) {
            ("name", FieldValue::Text(v)) => self.name = v.clone(),
            ("age", FieldValue::Int(v)) => self.age = *v,
            ("score", FieldValue::Double(v)) => self.score = *v,
            ("isActive", FieldValue::Bool(v)) => self.is_active = *v,
            ("name" | "age" | "score" | "isActive", other) => {
                return Err(type_mismatch(&update.field, other));
            }
            _ => return Err(unknown_field(&update.field)),
        }
        Ok(())
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => Some(FieldValue::Text(self.name.clone())),
            "age" => Some(FieldValue::Int(self.age)),
            "score" => Some(FieldValue::Double(self.score)),
            "isActive" => Some(FieldValue::Bool(self.is_active)),
            _ => None,
        }
    }
}

impl BenchRecord for ComplexRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn apply_update(&mut self, update: &FieldUpdate) -> crate::error::Result<()> {
        match (update.field.as_str(), &update.value) {
            ("name", FieldValue::Text(v)) => self.name = v.clone(),
            ("value", FieldValue::Int(v)) => self.value = *v,
            ("score", FieldValue::Double(v)) => self.score = *v,
            ("isEnabled", FieldValue::Bool(v)) => self.is_enabled = *v,
            ("name" | "value" | "score" | "isEnabled", other) => {
                return Err(type_mismatch(&update.field, other));
            }
            _ => return Err(unknown_field(&update.field)),
        }
        Ok(())
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => Some(FieldValue::Text(self.name.clone())),
            "value" => Some(FieldValue::Int(self.value)),
            "score" => Some(FieldValue::Double(self.score)),
            "isEnabled" => Some(FieldValue::Bool(self.is_enabled)),
            _ => None,
        }
    }
}

impl BenchRecord for FlatRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn apply_update(&mut self, update: &FieldUpdate) -> crate::error::Result<()> {
        match (update.field.as_str(), &update.value) {
            ("name", FieldValue::Text(v)) => self.name = v.clone(),
            ("category", FieldValue::Text(v)) => self.category = v.clone(),
            ("price", FieldValue::Int(v)) => self.price = *v,
            ("description", FieldValue::Text(v)) => self.description = v.clone(),
            ("isActive", FieldValue::Bool(v)) => self.is_active = *v,
            ("name" | "category" | "price" | "description" | "isActive", other) => {
                return Err(type_mismatch(&update.field, other));
            }
            _ => return Err(unknown_field(&update.field)),
        }
        Ok(())
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => Some(FieldValue::Text(self.name.clone())),
            "category" => Some(FieldValue::Text(self.category.clone())),
            "price" => Some(FieldValue::Int(self.price)),
            "description" => Some(FieldValue::Text(self.description.clone())),
            "isActive" => Some(FieldValue::Bool(self.is_active)),
            _ => None,
        }
    }
}

impl BenchRecord for ProductRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn apply_update(&mut self, update: &FieldUpdate) -> crate::error::Result<()> {
        match (update.field.as_str(), &update.value) {
            ("name", FieldValue::Text(v)) => self.name = v.clone(),
            ("category", FieldValue::Text(v)) => self.category = v.clone(),
            ("price", FieldValue::Int(v)) => self.price = *v,
            ("description", FieldValue::Text(v)) => self.description = v.clone(),
            ("isActive", FieldValue::Bool(v)) => self.is_active = *v,
            ("name" | "category" | "price" | "description" | "isActive", other) => {
                return Err(type_mismatch(&update.field, other));
            }
            _ => return Err(unknown_field(&update.field)),
        }
        Ok(())
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => Some(FieldValue::Text(self.name.clone())),
            "category" => Some(FieldValue::Text(self.category.clone())),
            "price" => Some(FieldValue::Int(self.price)),
            "description" => Some(FieldValue::Text(self.description.clone())),
            "isActive" => Some(FieldValue::Bool(self.is_active)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple() -> SimpleRecord {
        SimpleRecord {
            id: "id-0".to_string(),
            name: "Name 0".to_string(),
            age: 20,
            score: 0.0,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn apply_update_changes_field() {
        let mut record = simple();
        record
            .apply_update(&FieldUpdate::new("age", 35i64))
            .unwrap();
        assert_eq!(record.age, 35);
    }

    #[test]
    fn apply_update_rejects_unknown_field() {
        let mut record = simple();
        let err = record
            .apply_update(&FieldUpdate::new("colour", "red"))
            .unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn apply_update_rejects_type_mismatch() {
        let mut record = simple();
        let err = record
            .apply_update(&FieldUpdate::new("age", "not a number"))
            .unwrap_err();
        assert!(err.to_string().contains("type mismatch"));
    }

    #[test]
    fn flat_record_json_uses_camel_case() {
        let record = FlatRecord {
            id: "FLAT-000001".to_string(),
            name: "Product-AA".to_string(),
            category: "Electronics".to_string(),
            price: 100,
            date: Utc::now(),
            description: "premium".to_string(),
            is_active: true,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"isActive\":true"));
    }
}
