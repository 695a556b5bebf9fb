//! Search scenario configuration and execution.

pub mod config;
pub mod runner;

pub use config::{ExpectedCount, QueryParameters, SearchScenario};
pub use runner::{ExpectationWarning, SearchRunOutput, run_scenarios};
