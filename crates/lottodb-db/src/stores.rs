//! Database operations for the `lotto_stores` leaderboard table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// Input record for upserting one leaderboard entry.
#[derive(Debug, Clone)]
pub struct NewStoreRecord {
    pub store_name: String,
    pub address: String,
    pub region: String,
    pub wins_1st: i32,
    pub wins_2nd: i32,
    pub total_wins: i32,
    pub rank: i32,
}

/// A row from the `lotto_stores` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreRow {
    pub id: i64,
    pub store_name: String,
    pub address: String,
    pub region: String,
    pub wins_1st: i32,
    pub wins_2nd: i32,
    pub total_wins: i32,
    pub rank: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of persisting one ranked batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveTotals {
    pub saved: usize,
    pub failed: usize,
}

// ---------------------------------------------------------------------------
// Write operations
// ---------------------------------------------------------------------------

/// Upsert one leaderboard record, keyed on the natural key
/// `(store_name, address)`.
///
/// An existing row has its mutable fields (`region`, win counters, `rank`)
/// overwritten and `updated_at` refreshed; a new outlet is inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn upsert_store(pool: &PgPool, record: &NewStoreRecord) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO lotto_stores \
             (store_name, address, region, wins_1st, wins_2nd, total_wins, rank) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (store_name, address) DO UPDATE SET \
             region     = EXCLUDED.region, \
             wins_1st   = EXCLUDED.wins_1st, \
             wins_2nd   = EXCLUDED.wins_2nd, \
             total_wins = EXCLUDED.total_wins, \
             rank       = EXCLUDED.rank, \
             updated_at = NOW()",
    )
    .bind(&record.store_name)
    .bind(&record.address)
    .bind(&record.region)
    .bind(record.wins_1st)
    .bind(record.wins_2nd)
    .bind(record.total_wins)
    .bind(record.rank)
    .execute(pool)
    .await?;

    Ok(())
}

/// Persist a full ranked batch, one independent upsert per record.
///
/// A failed upsert is logged and counted; it never blocks the remaining
/// records. The leaderboard view is only consistent once the whole batch
/// has been written, so callers should treat a non-zero `failed` count as a
/// reason to re-run.
pub async fn save_ranked_stores(pool: &PgPool, records: &[NewStoreRecord]) -> SaveTotals {
    let mut totals = SaveTotals::default();
    for record in records {
        match upsert_store(pool, record).await {
            Ok(()) => totals.saved += 1,
            Err(e) => {
                tracing::error!(
                    store_name = %record.store_name,
                    error = %e,
                    "failed to upsert store record"
                );
                totals.failed += 1;
            }
        }
    }
    totals
}

// ---------------------------------------------------------------------------
// Read operations
// ---------------------------------------------------------------------------

/// The top of the leaderboard, best rank first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_top_stores(pool: &PgPool, limit: i64) -> Result<Vec<StoreRow>, DbError> {
    let rows = sqlx::query_as::<_, StoreRow>(
        "SELECT id, store_name, address, region, \
                wins_1st, wins_2nd, total_wins, rank, \
                created_at, updated_at \
         FROM lotto_stores \
         ORDER BY rank ASC, total_wins DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// All outlets in one region, most wins first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_stores_by_region(pool: &PgPool, region: &str) -> Result<Vec<StoreRow>, DbError> {
    let rows = sqlx::query_as::<_, StoreRow>(
        "SELECT id, store_name, address, region, \
                wins_1st, wins_2nd, total_wins, rank, \
                created_at, updated_at \
         FROM lotto_stores \
         WHERE region = $1 \
         ORDER BY total_wins DESC",
    )
    .bind(region)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
