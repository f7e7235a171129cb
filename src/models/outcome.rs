//! Outcome of a single search-count request.

use std::fmt;

/// Classified result of asking the search API for a domain's result count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Total results reported by the API (also used for non-quota HTTP errors)
    Count(u64),
    /// HTTP 429 or 403; the run must stop
    QuotaExceeded,
    /// Transport or decoding failure; nothing is recorded for the row
    TransientFailure(String),
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::Count(n) => write!(f, "count {n}"),
            SearchOutcome::QuotaExceeded => f.write_str("quota exceeded"),
            SearchOutcome::TransientFailure(reason) => write!(f, "transient failure: {reason}"),
        }
    }
}
