// src/lib.rs

//! SERC Harvest Library
//!
//! Counts search-engine results for privacy and legal-notice keywords on
//! firm domains recovered from web-archive URLs, and pseudonymizes the
//! firm identifiers for publication.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
