//! Single-round draw-number collection command.

use lottodb_db::NewDraw;
use lottodb_scraper::DrawResult;

/// Fetch one round's winning numbers (latest when `round` is `None`) and
/// upsert them into `lotto_draws`.
pub(crate) async fn run_draw(round: Option<u32>) -> anyhow::Result<()> {
    let config = lottodb_core::load_app_config()?;
    // Interactive one-shot fetch; the short timeout applies.
    let client =
        crate::stores::build_client(&config, config.crawler_interactive_timeout_secs)?;

    let round = match round {
        Some(round) => round,
        None => client.fetch_latest_round().await?,
    };
    tracing::debug!(round, "collecting draw result");

    let draw = client.fetch_draw(round).await?;
    println!(
        "Round {}: {:?} + bonus {} ({})",
        draw.round,
        draw.numbers,
        draw.bonus,
        draw.draw_date
            .map_or_else(|| "date unknown".to_owned(), |d| d.to_string())
    );

    let pool = lottodb_db::connect_pool_from_env().await?;
    lottodb_db::upsert_draw(&pool, &to_record(&draw)).await?;
    println!("  ✓ saved");
    Ok(())
}

/// Print the most recently collected draws, newest first.
pub(crate) async fn run_recent(limit: i64) -> anyhow::Result<()> {
    lottodb_core::load_app_config()?;
    let pool = lottodb_db::connect_pool_from_env().await?;
    let rows = lottodb_db::list_latest_draws(&pool, limit).await?;

    if rows.is_empty() {
        println!("no draws collected yet — run `lottodb-cli draw` first");
        return Ok(());
    }

    for row in rows {
        println!(
            "Round {}: [{}, {}, {}, {}, {}, {}] + bonus {} ({})",
            row.round,
            row.number1,
            row.number2,
            row.number3,
            row.number4,
            row.number5,
            row.number6,
            row.bonus_number,
            row.draw_date
                .map_or_else(|| "date unknown".to_owned(), |d| d.to_string())
        );
    }
    Ok(())
}

fn to_record(draw: &DrawResult) -> NewDraw {
    NewDraw {
        round: i32::try_from(draw.round).unwrap_or(i32::MAX),
        draw_date: draw.draw_date,
        numbers: draw.numbers.map(i16::from),
        bonus_number: i16::from(draw.bonus),
    }
}
