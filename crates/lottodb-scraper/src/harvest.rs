//! Historical store harvest: walks a round range, folds every round's
//! first-prize table into the aggregator, and finalizes a ranked leaderboard.
//!
//! Rounds are fetched strictly in ascending order, one at a time. Sequential
//! pacing (inter-round and inter-batch delays) is the mechanism that keeps
//! the crawl under the site's implicit anti-scraping threshold; parallel
//! fan-out would risk an IP block, which corrupts far more data than an
//! occasional lost round.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::aggregate::WinAggregator;
use crate::client::LottoClient;
use crate::error::ScraperError;
use crate::rank::{rank_stores, RankedStore};
use crate::store_page::parse_store_page;

/// First round with a winning-store listing usable for aggregation.
pub const DEFAULT_START_ROUND: u32 = 601;

/// Last-resort end of range when neither the caller nor the site can supply
/// the latest round number.
pub const FALLBACK_LATEST_ROUND: u32 = 1196;

pub const DEFAULT_BATCH_SIZE: u32 = 100;

/// Cooperative cancellation flag checked between rounds.
///
/// Cancelling does not discard progress: the harvest finalizes and returns
/// whatever was aggregated up to that point.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
pub struct HarvestOptions {
    pub start_round: u32,
    /// `None` means "resolve from the site, falling back to
    /// [`FALLBACK_LATEST_ROUND`]".
    pub end_round: Option<u32>,
    /// Rounds per progress checkpoint. Observability only — batch boundaries
    /// never affect aggregation.
    pub batch_size: u32,
    pub inter_round_delay_ms: u64,
    pub inter_batch_delay_ms: u64,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            start_round: DEFAULT_START_ROUND,
            end_round: None,
            batch_size: DEFAULT_BATCH_SIZE,
            inter_round_delay_ms: 1000,
            inter_batch_delay_ms: 1000,
        }
    }
}

/// Observational counters for one harvest run. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    pub start_round: u32,
    pub end_round: u32,
    pub rounds_attempted: u32,
    pub rounds_succeeded: u32,
    pub rounds_failed: u32,
    /// Rounds that failed to fetch or yielded zero valid rows.
    pub failed_rounds: Vec<u32>,
    /// Distinct outlets in the final leaderboard.
    pub collected_stores: usize,
    /// Filled in by the persistence step.
    pub saved_stores: usize,
    pub cancelled: bool,
}

/// Checkpoint handed to the progress callback after each full batch.
#[derive(Debug, Clone)]
pub struct BatchCheckpoint {
    /// 1-based batch number.
    pub batch: u32,
    pub rounds_done: u32,
    pub rounds_total: u32,
    pub rounds_succeeded: u32,
    pub rounds_failed: u32,
    pub elapsed: Duration,
}

pub type ProgressFn = dyn Fn(&BatchCheckpoint) + Send + Sync;

/// Ranked leaderboard plus the run's counters.
#[derive(Debug)]
pub struct HarvestOutcome {
    pub report: HarvestReport,
    pub stores: Vec<RankedStore>,
}

/// Resolves the end of the round range: the caller-supplied value wins, then
/// the site's latest published round, then [`FALLBACK_LATEST_ROUND`].
///
/// Discovery failure degrades to the fallback instead of aborting — an
/// undefined range would make the whole run meaningless, but the fallback
/// constant guarantees the range is always defined.
pub async fn resolve_end_round(client: &LottoClient, requested: Option<u32>) -> u32 {
    if let Some(end) = requested {
        return end;
    }
    match client.fetch_latest_round().await {
        Ok(latest) => latest,
        Err(e) => {
            tracing::warn!(
                error = %e,
                fallback = FALLBACK_LATEST_ROUND,
                "could not discover latest round — using fallback"
            );
            FALLBACK_LATEST_ROUND
        }
    }
}

/// Crawls the configured round range and returns the ranked leaderboard.
///
/// A round that times out through every retry, fails transport, or parses to
/// zero valid rows is counted as failed and skipped; the range continues.
/// One bad round must not abort collection of a thousand others.
///
/// `on_batch`, when given, is invoked after every `batch_size` rounds with a
/// [`BatchCheckpoint`].
///
/// # Errors
///
/// Returns [`ScraperError::InvalidRange`] when the resolved range is empty
/// (`start > end`). Per-round failures are reported, never raised.
pub async fn harvest_stores(
    client: &LottoClient,
    options: &HarvestOptions,
    cancel: &CancelFlag,
    on_batch: Option<&ProgressFn>,
) -> Result<HarvestOutcome, ScraperError> {
    let start = options.start_round;
    let end = resolve_end_round(client, options.end_round).await;
    if start > end {
        return Err(ScraperError::InvalidRange { start, end });
    }

    let rounds_total = end - start + 1;
    let batch_size = options.batch_size.max(1);
    tracing::info!(start, end, rounds_total, batch_size, "starting store harvest");

    let mut report = HarvestReport {
        start_round: start,
        end_round: end,
        ..HarvestReport::default()
    };
    let mut aggregator = WinAggregator::new();
    let started_at = Instant::now();
    let mut batch_succeeded = 0u32;
    let mut batch_failed = 0u32;

    for (idx, round) in (start..=end).enumerate() {
        if cancel.is_cancelled() {
            tracing::info!(round, "harvest cancelled — finalizing partial result");
            report.cancelled = true;
            break;
        }

        report.rounds_attempted += 1;
        match client.fetch_store_page(Some(round)).await {
            Ok(html) => {
                let rows = parse_store_page(&html);
                if rows.is_empty() {
                    tracing::warn!(round, "round yielded no valid store rows");
                    report.rounds_failed += 1;
                    report.failed_rounds.push(round);
                    batch_failed += 1;
                } else {
                    for row in &rows {
                        aggregator.record(row);
                    }
                    tracing::debug!(round, rows = rows.len(), "round aggregated");
                    report.rounds_succeeded += 1;
                    batch_succeeded += 1;
                }
            }
            Err(e) => {
                tracing::warn!(round, error = %e, "round fetch failed — skipping");
                report.rounds_failed += 1;
                report.failed_rounds.push(round);
                batch_failed += 1;
            }
        }

        let rounds_done = u32::try_from(idx).unwrap_or(u32::MAX).saturating_add(1);
        let is_last = round == end;
        let batch_boundary = rounds_done % batch_size == 0;

        if batch_boundary || is_last {
            let checkpoint = BatchCheckpoint {
                batch: rounds_done.div_ceil(batch_size),
                rounds_done,
                rounds_total,
                rounds_succeeded: batch_succeeded,
                rounds_failed: batch_failed,
                elapsed: started_at.elapsed(),
            };
            tracing::info!(
                batch = checkpoint.batch,
                rounds_done,
                rounds_total,
                elapsed_secs = checkpoint.elapsed.as_secs(),
                "batch checkpoint"
            );
            if let Some(progress) = on_batch {
                progress(&checkpoint);
            }
            batch_succeeded = 0;
            batch_failed = 0;
        }

        if !is_last {
            let pause_ms = if batch_boundary {
                options.inter_round_delay_ms + options.inter_batch_delay_ms
            } else {
                options.inter_round_delay_ms
            };
            if pause_ms > 0 {
                tokio::time::sleep(Duration::from_millis(pause_ms)).await;
            }
        }
    }

    let stores = rank_stores(aggregator.into_tallies());
    report.collected_stores = stores.len();
    tracing::info!(
        attempted = report.rounds_attempted,
        succeeded = report.rounds_succeeded,
        failed = report.rounds_failed,
        stores = report.collected_stores,
        "store harvest finished"
    );

    Ok(HarvestOutcome { report, stores })
}
