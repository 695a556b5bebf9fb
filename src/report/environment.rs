//! Host environment capture for report metadata.
//!
//! Collection is best effort: a probe that cannot determine a value
//! reports a zero or an empty string rather than failing the run.
//! Results are comparable across runs only when captured the same way,
//! so the probe sits behind a trait and tests substitute a fixed one.

use serde::{Deserialize, Serialize};
use std::fs;
use std::thread;

/// Snapshot of the host the benchmark ran on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentInfo {
    pub cpu_model: String,
    pub cpu_cores: usize,
    pub ram_gb: f64,
    pub os_version: String,
    /// System load at capture time, normalized per core (0.0-1.0+).
    pub cpu_usage: f64,
    /// Fraction of physical memory in use (0.0-1.0).
    pub memory_usage: f64,
}

impl EnvironmentInfo {
    /// Placeholder for tests and offline report manipulation.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            cpu_model: String::new(),
            cpu_cores: 0,
            ram_gb: 0.0,
            os_version: String::new(),
            cpu_usage: 0.0,
            memory_usage: 0.0,
        }
    }
}

/// Source of environment snapshots.
pub trait EnvironmentProbe {
    fn collect(&self) -> EnvironmentInfo;
}

/// Probe reading from the local host.
///
/// Uses `/proc` on Linux; on other platforms only the portable fields
/// (core count, OS name) are populated.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostProbe;

impl HostProbe {
    fn cpu_model() -> String {
        read_proc_field("/proc/cpuinfo", "model name").unwrap_or_default()
    }

    fn mem_total_kb() -> Option<f64> {
        read_proc_field("/proc/meminfo", "MemTotal")
            .and_then(|v| v.split_whitespace().next().map(str::to_string))
            .and_then(|v| v.parse::<f64>().ok())
    }

    fn mem_available_kb() -> Option<f64> {
        read_proc_field("/proc/meminfo", "MemAvailable")
            .and_then(|v| v.split_whitespace().next().map(str::to_string))
            .and_then(|v| v.parse::<f64>().ok())
    }

    fn load_per_core(cores: usize) -> f64 {
        if cores == 0 {
            return 0.0;
        }
        let Ok(loadavg) = fs::read_to_string("/proc/loadavg") else {
            return 0.0;
        };
        loadavg
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<f64>().ok())
            .map_or(0.0, |load| load / cores as f64)
    }
}

impl EnvironmentProbe for HostProbe {
    fn collect(&self) -> EnvironmentInfo {
        let cpu_cores = thread::available_parallelism().map_or(0, std::num::NonZeroUsize::get);
        let mem_total = Self::mem_total_kb();
        let ram_gb = mem_total.map_or(0.0, |kb| kb / (1024.0 * 1024.0));
        let memory_usage = match (mem_total, Self::mem_available_kb()) {
            (Some(total), Some(available)) if total > 0.0 => 1.0 - available / total,
            _ => 0.0,
        };

        EnvironmentInfo {
            cpu_model: Self::cpu_model(),
            cpu_cores,
            ram_gb,
            os_version: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
            cpu_usage: Self::load_per_core(cpu_cores),
            memory_usage,
        }
    }
}

/// First `: `-separated value for `key` in a /proc-style file.
fn read_proc_field(path: &str, key: &str) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    content.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        (name.trim() == key).then(|| value.trim().to_string())
    })
}
