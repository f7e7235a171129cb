// src/models/mod.rs

//! Domain models for the harvester.
//!
//! This module contains the data structures shared by the services,
//! storage and pipeline layers.

mod config;
mod outcome;
mod record;
mod stats;

// Re-export all public types
pub use config::{Config, HarvestConfig, PseudonymizeConfig, SearchConfig};
pub use outcome::SearchOutcome;
pub use record::{FirmRecord, IdColumn, SercResult};
pub use stats::{HarvestProgress, HarvestStats};
