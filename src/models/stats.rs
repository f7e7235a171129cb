//! Run statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::IdColumn;

/// Counters collected over one harvest run.
#[derive(Debug, Clone, Serialize)]
pub struct HarvestStats {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Identifier column used by the input and output files
    pub id_column: IdColumn,
    /// Rows in the input mapping
    pub input_rows: usize,
    /// Input rows not yet present in the output when the run started
    pub remaining_at_start: usize,
    /// Search requests issued
    pub queried: usize,
    /// Results appended to the output
    pub recorded: usize,
    /// Rows skipped because no domain could be extracted
    pub skipped_no_domain: usize,
    /// Rows skipped after a transport or decoding failure
    pub transient_failures: usize,
    /// Append operations on the output file
    pub flushes: usize,
    /// Whether the run ended on a quota response
    pub quota_stopped: bool,
}

impl HarvestStats {
    pub fn new(id_column: IdColumn, input_rows: usize, remaining_at_start: usize) -> Self {
        let now = Utc::now();
        Self {
            start_time: now,
            end_time: now,
            id_column,
            input_rows,
            remaining_at_start,
            queried: 0,
            recorded: 0,
            skipped_no_domain: 0,
            transient_failures: 0,
            flushes: 0,
            quota_stopped: false,
        }
    }

    /// Elapsed wall-clock seconds.
    pub fn elapsed_secs(&self) -> i64 {
        (self.end_time - self.start_time).num_seconds()
    }
}

/// Progress of the output file against the input mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarvestProgress {
    pub id_column: IdColumn,
    pub input_rows: usize,
    pub harvested: usize,
    pub remaining: usize,
}
