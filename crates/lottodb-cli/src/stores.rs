//! Historical winning-store harvest and leaderboard commands.

use lottodb_db::NewStoreRecord;
use lottodb_scraper::harvest::{harvest_stores, BatchCheckpoint, HarvestOptions};
use lottodb_scraper::{CancelFlag, LottoClient, RankedStore};

/// Run the batch-historical store crawl and persist the ranked leaderboard.
///
/// Round-level failures are reported in the summary, never as an error:
/// the process exits 0 as long as the run itself completed. A non-zero exit
/// only signals configuration or range errors.
pub(crate) async fn run_stores(
    start: u32,
    end: Option<u32>,
    batch_size: u32,
    dry_run: bool,
) -> anyhow::Result<()> {
    let config = lottodb_core::load_app_config()?;
    tracing::debug!(?config, "configuration loaded");
    let client = build_client(&config, config.crawler_request_timeout_secs)?;

    let options = HarvestOptions {
        start_round: start,
        end_round: end,
        batch_size,
        inter_round_delay_ms: config.crawler_inter_round_delay_ms,
        inter_batch_delay_ms: config.crawler_inter_batch_delay_ms,
    };

    println!(
        "Harvesting winning stores: rounds {start}..{} (batch size {batch_size})",
        end.map_or_else(|| "latest".to_owned(), |e| e.to_string())
    );

    let print_checkpoint = |cp: &BatchCheckpoint| {
        println!(
            "  [batch {}] {}/{} rounds ({:.1}%) — {} ok, {} failed, {:.1}s elapsed",
            cp.batch,
            cp.rounds_done,
            cp.rounds_total,
            f64::from(cp.rounds_done) / f64::from(cp.rounds_total) * 100.0,
            cp.rounds_succeeded,
            cp.rounds_failed,
            cp.elapsed.as_secs_f64(),
        );
    };

    let cancel = CancelFlag::new();
    let mut outcome =
        harvest_stores(&client, &options, &cancel, Some(&print_checkpoint)).await?;

    if dry_run {
        println!(
            "dry-run: would upsert {} store records; top of the board:",
            outcome.stores.len()
        );
        for store in outcome.stores.iter().take(10) {
            println!(
                "  {:>3}. {} ({}) — {} wins",
                store.rank, store.store_name, store.region, store.total_wins
            );
        }
        print_summary(&outcome.report);
        return Ok(());
    }

    let pool = lottodb_db::connect_pool_from_env().await?;
    let records: Vec<NewStoreRecord> = outcome.stores.iter().map(to_record).collect();
    let totals = lottodb_db::save_ranked_stores(&pool, &records).await;
    outcome.report.saved_stores = totals.saved;

    if totals.failed > 0 {
        println!(
            "  ✗ {} record(s) failed to persist — leaderboard may be incomplete, re-run advised",
            totals.failed
        );
    }
    print_summary(&outcome.report);
    Ok(())
}

/// Print the persisted leaderboard, optionally restricted to one region.
pub(crate) async fn run_top(limit: i64, region: Option<&str>) -> anyhow::Result<()> {
    lottodb_core::load_app_config()?;
    let pool = lottodb_db::connect_pool_from_env().await?;
    let rows = match region {
        Some(region) => lottodb_db::list_stores_by_region(&pool, region).await?,
        None => lottodb_db::list_top_stores(&pool, limit).await?,
    };

    if rows.is_empty() {
        println!("leaderboard is empty — run `lottodb-cli stores` first");
        return Ok(());
    }

    let rows = rows.into_iter().take(usize::try_from(limit).unwrap_or(usize::MAX));

    for row in rows {
        println!(
            "{:>3}. {} — {} ({}) — 1st: {}, 2nd: {}, total: {}",
            row.rank,
            row.store_name,
            row.address,
            row.region,
            row.wins_1st,
            row.wins_2nd,
            row.total_wins
        );
    }
    Ok(())
}

/// Builds a `LottoClient` from config. `timeout_secs` is passed per call
/// site: batch crawls wait out a stalled site, interactive fetches don't.
pub(crate) fn build_client(
    config: &lottodb_core::AppConfig,
    timeout_secs: u64,
) -> anyhow::Result<LottoClient> {
    Ok(LottoClient::new(
        &config.lotto_base_url,
        timeout_secs,
        &config.crawler_user_agent,
        config.crawler_max_attempts,
        config.crawler_backoff_step_secs,
    )?)
}

fn to_record(store: &RankedStore) -> NewStoreRecord {
    NewStoreRecord {
        store_name: store.store_name.clone(),
        address: store.address.clone(),
        region: store.region.clone(),
        wins_1st: i32::try_from(store.wins_1st).unwrap_or(i32::MAX),
        wins_2nd: i32::try_from(store.wins_2nd).unwrap_or(i32::MAX),
        total_wins: i32::try_from(store.total_wins).unwrap_or(i32::MAX),
        rank: i32::try_from(store.rank).unwrap_or(i32::MAX),
    }
}

fn print_summary(report: &lottodb_scraper::HarvestReport) {
    println!("Harvest complete: rounds {}..{}", report.start_round, report.end_round);
    println!(
        "  attempted: {}, succeeded: {}, failed: {}",
        report.rounds_attempted, report.rounds_succeeded, report.rounds_failed
    );
    if !report.failed_rounds.is_empty() {
        println!("  failed rounds: {:?}", report.failed_rounds);
    }
    if report.cancelled {
        println!("  run was cancelled — counts cover the processed prefix only");
    }
    println!(
        "  stores collected: {}, saved: {}",
        report.collected_stores, report.saved_stores
    );
}
