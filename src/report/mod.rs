//! Report artifacts.
//!
//! Every run produces a JSON document with camelCase keys so artifacts
//! from different implementations of the same benchmark remain
//! directly comparable. Durations are reported in milliseconds as
//! floating point.

pub mod environment;

pub use environment::{EnvironmentInfo, EnvironmentProbe, HostProbe};

use crate::error::{DbPerfError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Run-level metadata shared by all report kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    pub timestamp: DateTime<Utc>,
    pub database_name: String,
    pub database_version: String,
    pub environment: EnvironmentInfo,
}

impl RunMetadata {
    #[must_use]
    pub fn new(database_name: &str, database_version: &str, environment: EnvironmentInfo) -> Self {
        Self {
            timestamp: Utc::now(),
            database_name: database_name.to_string(),
            database_version: database_version.to_string(),
            environment,
        }
    }
}

/// Timings for one data-size stage, milliseconds.
///
/// `initialization` is present only in the first stage;
/// `delete` only in the last.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageMeasurements {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initialization: Option<f64>,
    pub create: f64,
    pub batch_create: f64,
    pub read: f64,
    pub indexed_search: f64,
    pub non_indexed_search: f64,
    pub complex_query: f64,
    pub update: f64,
    pub transaction: f64,
    pub concurrency: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<f64>,
}

/// One stage of the staged benchmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageResult {
    pub data_size: usize,
    pub measurements: StageMeasurements,
}

/// Complete CRUD benchmark artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResult {
    pub metadata: RunMetadata,
    pub results: Vec<StageResult>,
}

/// One timed search scenario inside a search report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchScenarioResult {
    pub scenario: String,
    pub response_time_ms: f64,
    pub result_count: usize,
    pub indexed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_condition: Option<String>,
}

/// Complete search benchmark artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBenchmarkReport {
    pub metadata: RunMetadata,
    pub fixture_load_time_ms: f64,
    pub search_results: Vec<SearchScenarioResult>,
}

/// One backend's timing for a scenario inside a comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabasePerformance {
    pub database_name: String,
    pub response_time_ms: f64,
    pub result_count: usize,
}

/// Cross-backend comparison assembled from saved search reports.
///
/// Scenarios are keyed in a sorted map so the document layout is
/// stable regardless of input order; within a scenario, backends are
/// sorted fastest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchComparisonReport {
    pub timestamp: DateTime<Utc>,
    pub scenario_comparisons: BTreeMap<String, Vec<DatabasePerformance>>,
}

impl SearchComparisonReport {
    /// Build a comparison from individual search reports.
    #[must_use]
    pub fn from_reports(reports: &[SearchBenchmarkReport]) -> Self {
        let mut scenario_comparisons: BTreeMap<String, Vec<DatabasePerformance>> = BTreeMap::new();
        for report in reports {
            for result in &report.search_results {
                scenario_comparisons
                    .entry(result.scenario.clone())
                    .or_default()
                    .push(DatabasePerformance {
                        database_name: report.metadata.database_name.clone(),
                        response_time_ms: result.response_time_ms,
                        result_count: result.result_count,
                    });
            }
        }
        for entries in scenario_comparisons.values_mut() {
            entries.sort_by(|a, b| a.response_time_ms.total_cmp(&b.response_time_ms));
        }
        Self {
            timestamp: Utc::now(),
            scenario_comparisons,
        }
    }
}

/// Filename-safe timestamp prefix, second resolution.
fn timestamp_slug(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

fn save_json<T: Serialize>(dir: &Path, filename: &str, value: &T) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    fs::write(&path, serde_json::to_vec_pretty(value)?)?;
    info!(path = %path.display(), "report written");
    Ok(path)
}

fn load_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(DbPerfError::FixtureNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(serde_json::from_slice(&fs::read(path)?)?)
}

impl BenchmarkResult {
    /// Save under `dir` as `{timestamp}-{databaseName}.json`.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory or file cannot be written.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let filename = format!(
            "{}-{}.json",
            timestamp_slug(self.metadata.timestamp),
            self.metadata.database_name
        );
        save_json(dir, &filename, self)
    }

    /// Load a previously saved artifact.
    ///
    /// # Errors
    ///
    /// Returns an error when the file is missing or malformed.
    pub fn load(path: &Path) -> Result<Self> {
        load_json(path)
    }
}

impl SearchBenchmarkReport {
    /// Save under `dir` as `{timestamp}-search-{databaseName}.json`.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory or file cannot be written.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let filename = format!(
            "{}-search-{}.json",
            timestamp_slug(self.metadata.timestamp),
            self.metadata.database_name
        );
        save_json(dir, &filename, self)
    }

    /// Load a previously saved artifact.
    ///
    /// # Errors
    ///
    /// Returns an error when the file is missing or malformed.
    pub fn load(path: &Path) -> Result<Self> {
        load_json(path)
    }
}

impl SearchComparisonReport {
    /// Save under `dir` as `{timestamp}-comparison.json`.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory or file cannot be written.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let filename = format!("{}-comparison.json", timestamp_slug(self.timestamp));
        save_json(dir, &filename, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_report(name: &str, equality_ms: f64) -> SearchBenchmarkReport {
        SearchBenchmarkReport {
            metadata: RunMetadata::new(name, "1.0", EnvironmentInfo::unknown()),
            fixture_load_time_ms: 10.0,
            search_results: vec![SearchScenarioResult {
                scenario: "Equality".to_string(),
                response_time_ms: equality_ms,
                result_count: 15_000,
                indexed: true,
                query_condition: Some("name == 'Product-AA'".to_string()),
            }],
        }
    }

    #[test]
    fn stage_measurements_omit_absent_phases() {
        let json = serde_json::to_string(&StageMeasurements::default()).unwrap();
        assert!(!json.contains("initialization"));
        assert!(!json.contains("delete"));
        assert!(json.contains("\"batchCreate\""));
        assert!(json.contains("\"nonIndexedSearch\""));
    }

    #[test]
    fn comparison_sorts_fastest_first() {
        let comparison = SearchComparisonReport::from_reports(&[
            search_report("slow-db", 20.0),
            search_report("fast-db", 5.0),
        ]);
        let entries = &comparison.scenario_comparisons["Equality"];
        assert_eq!(entries[0].database_name, "fast-db");
        assert_eq!(entries[1].database_name, "slow-db");
    }

    #[test]
    fn benchmark_result_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let result = BenchmarkResult {
            metadata: RunMetadata::new("memory", "in-memory", EnvironmentInfo::unknown()),
            results: vec![StageResult {
                data_size: 1_000,
                measurements: StageMeasurements {
                    initialization: Some(1.5),
                    create: 2.0,
                    ..StageMeasurements::default()
                },
            }],
        };

        let path = result.save(dir.path()).unwrap();
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .ends_with("-memory.json")
        );

        let loaded = BenchmarkResult::load(&path).unwrap();
        assert_eq!(loaded.results.len(), 1);
        assert_eq!(loaded.results[0].data_size, 1_000);
        assert_eq!(loaded.results[0].measurements.initialization, Some(1.5));
    }

    #[test]
    fn load_missing_report_fails_cleanly() {
        let err = BenchmarkResult::load(Path::new("/nonexistent/report.json")).unwrap_err();
        assert!(matches!(err, DbPerfError::FixtureNotFound { .. }));
    }
}
