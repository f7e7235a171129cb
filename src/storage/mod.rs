//! CSV-backed storage for the harvester.
//!
//! ## Files
//!
//! ```text
//! data/sample_data.csv            # Input: nif|nif_anon, archive_url
//! serc_multilingual_results.csv   # Output: nif|nif_anon, domain, serc_count
//! ```
//!
//! The output is append-only; resume works by skipping identifiers that
//! already appear in it.

pub mod mapping;
pub mod results;

// Re-export for convenience
pub use mapping::{ARCHIVE_URL_COLUMN, FirmMapping};
pub use results::{ResultStore, SeenIds};
