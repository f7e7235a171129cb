//! Pipeline entry points for harvester operations.
//!
//! - `run_harvest`: Query result counts for firms not yet in the output
//! - `run_status`: Report harvest progress without contacting the API
//! - `run_pseudonymize`: Build the public sample and private key

pub mod harvest;
pub mod pseudonymize;
pub mod status;

pub use harvest::run_harvest;
pub use pseudonymize::{PseudonymizeSummary, SurrogateMap, run_pseudonymize};
pub use status::run_status;
