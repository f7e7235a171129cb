//! Service layer for the harvester.
//!
//! - Query construction (`QueryBuilder`)
//! - Search-count requests (`SearchClient` behind `ResultCounter`)

mod query;
mod search;

pub use query::{KEYWORDS, QueryBuilder};
pub use search::{ResultCounter, SearchClient, classify_response};
