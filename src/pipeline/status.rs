// src/pipeline/status.rs

//! Harvest progress report.

use crate::error::Result;
use crate::models::{HarvestConfig, HarvestProgress};
use crate::storage::{FirmMapping, ResultStore};

/// Compare the results file against the input mapping without querying the API.
pub fn run_status(config: &HarvestConfig) -> Result<HarvestProgress> {
    let mapping = FirmMapping::load(&config.input_path)?;
    let seen = ResultStore::new(&config.output_path).load_seen()?;

    let remaining = mapping.remaining(&seen.ids);
    let progress = HarvestProgress {
        id_column: mapping.id_column,
        input_rows: mapping.len(),
        harvested: mapping.len() - remaining,
        remaining,
    };

    log::info!("Input: {} ({} rows)", config.input_path.display(), progress.input_rows);
    log::info!(
        "Output: {} ({})",
        config.output_path.display(),
        match seen.id_column {
            Some(column) => format!("{} ids under '{}'", seen.ids.len(), column),
            None => "not created yet".to_string(),
        }
    );
    log::info!(
        "Harvested {} | remaining {}",
        progress.harvested,
        progress.remaining
    );

    Ok(progress)
}
