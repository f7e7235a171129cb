// src/pipeline/harvest.rs

//! SERC harvest driver.
//!
//! Walks the input mapping in order, skipping firms already present in the
//! results file, and appends `{id, domain, serc_count}` rows in batches.
//! A quota response ends the run after flushing whatever is buffered; the
//! next run picks up from the results file.

use std::time::Duration;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{HarvestConfig, HarvestStats, IdColumn, SearchOutcome, SercResult};
use crate::services::ResultCounter;
use crate::storage::{FirmMapping, ResultStore};
use crate::utils::url::extract_domain;

/// Run one harvest pass over the configured input.
pub async fn run_harvest(
    config: &HarvestConfig,
    counter: &dyn ResultCounter,
) -> Result<HarvestStats> {
    let mapping = FirmMapping::load(&config.input_path)?;
    let store = ResultStore::new(&config.output_path);
    let seen = store.load_seen()?;

    if let Some(existing) = seen.id_column {
        if existing != mapping.id_column {
            return Err(AppError::validation(format!(
                "{} identifies firms by '{}' but {} uses '{}'",
                config.output_path.display(),
                existing,
                config.input_path.display(),
                mapping.id_column
            )));
        }
    }

    let id_column = mapping.id_column;
    let mut done = seen.ids;
    let remaining = mapping.remaining(&done);
    let mut stats = HarvestStats::new(id_column, mapping.len(), remaining);

    log::info!(
        "Starting harvest using column '{}': {} of {} firms remaining",
        id_column,
        remaining,
        mapping.len()
    );

    let delay = Duration::from_millis(config.request_delay_ms);
    let batch_size = config.batch_size.max(1);
    let mut buffer: Vec<SercResult> = Vec::with_capacity(batch_size);

    for firm in &mapping.records {
        if done.contains(&firm.identifier) {
            continue;
        }

        let Some(domain) = extract_domain(&firm.archive_url) else {
            stats.skipped_no_domain += 1;
            log::debug!(
                "No domain in archive URL for {} ({:?}); skipping",
                firm.identifier,
                firm.archive_url
            );
            continue;
        };

        let outcome = counter.count(&domain).await;
        stats.queried += 1;
        log::debug!("{} ({}): {}", firm.identifier, domain, outcome);

        match outcome {
            SearchOutcome::QuotaExceeded => {
                stats.quota_stopped = true;
                log::warn!(
                    "Quota reached at {} ({}). Stopping; run again later to resume.",
                    firm.identifier,
                    domain
                );
                break;
            }
            SearchOutcome::TransientFailure(reason) => {
                stats.transient_failures += 1;
                log::warn!(
                    "Search failed for {} ({}): {}; will retry on the next run",
                    firm.identifier,
                    domain,
                    reason
                );
            }
            SearchOutcome::Count(serc_count) => {
                done.insert(firm.identifier.clone());
                buffer.push(SercResult {
                    identifier: firm.identifier.clone(),
                    domain: domain.clone(),
                    serc_count,
                });

                if buffer.len() >= batch_size {
                    flush(&store, id_column, &mut buffer, &mut stats)?;
                    log::info!("Processed {} | Count: {}", domain, serc_count);
                }
            }
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    flush(&store, id_column, &mut buffer, &mut stats)?;
    stats.end_time = Utc::now();

    if stats.quota_stopped {
        log::warn!("Harvest paused on quota after recording {} result(s)", stats.recorded);
    } else {
        log::info!("Multilingual SERC harvest complete");
    }
    log::info!(
        "Queried {} | recorded {} | no domain {} | failed {} | {} flush(es) in {}s",
        stats.queried,
        stats.recorded,
        stats.skipped_no_domain,
        stats.transient_failures,
        stats.flushes,
        stats.elapsed_secs()
    );

    Ok(stats)
}

/// Append the buffer to the store and clear it.
fn flush(
    store: &ResultStore,
    id_column: IdColumn,
    buffer: &mut Vec<SercResult>,
    stats: &mut HarvestStats,
) -> Result<()> {
    if buffer.is_empty() {
        return Ok(());
    }

    store.append(id_column, buffer)?;
    stats.recorded += buffer.len();
    stats.flushes += 1;
    log::info!(
        "Saved {} result(s) to {}",
        buffer.len(),
        store.path().display()
    );
    buffer.clear();
    Ok(())
}
