//! Configuration loading and management for the Performance Analytics Engine.
//!
//! This module loads the scoring constants (KPI weights, call target,
//! working-day ratio and sentinel scores) from YAML and validates them.
//!
//! # Example
//!
//! ```no_run
//! use kpi_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config").unwrap();
//! println!("DCR weight: {}", loader.config().weights.dcr_compliance);
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, SCORING_FILE_NAME, validate};
pub use types::{KpiWeights, ScoringConfig};
