//! Database operations for the `lotto_draws` table.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::DbError;

/// Input record for upserting one round's winning numbers.
#[derive(Debug, Clone)]
pub struct NewDraw {
    pub round: i32,
    pub draw_date: Option<NaiveDate>,
    /// The six main numbers, site publication order.
    pub numbers: [i16; 6],
    pub bonus_number: i16,
}

/// A row from the `lotto_draws` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DrawRow {
    pub round: i32,
    pub draw_date: Option<NaiveDate>,
    pub number1: i16,
    pub number2: i16,
    pub number3: i16,
    pub number4: i16,
    pub number5: i16,
    pub number6: i16,
    pub bonus_number: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert one draw result, keyed on the round number.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn upsert_draw(pool: &PgPool, draw: &NewDraw) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO lotto_draws \
             (round, draw_date, number1, number2, number3, number4, number5, number6, bonus_number) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (round) DO UPDATE SET \
             draw_date    = EXCLUDED.draw_date, \
             number1      = EXCLUDED.number1, \
             number2      = EXCLUDED.number2, \
             number3      = EXCLUDED.number3, \
             number4      = EXCLUDED.number4, \
             number5      = EXCLUDED.number5, \
             number6      = EXCLUDED.number6, \
             bonus_number = EXCLUDED.bonus_number, \
             updated_at   = NOW()",
    )
    .bind(draw.round)
    .bind(draw.draw_date)
    .bind(draw.numbers[0])
    .bind(draw.numbers[1])
    .bind(draw.numbers[2])
    .bind(draw.numbers[3])
    .bind(draw.numbers[4])
    .bind(draw.numbers[5])
    .bind(draw.bonus_number)
    .execute(pool)
    .await?;

    Ok(())
}

/// The most recent draws, newest round first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_latest_draws(pool: &PgPool, limit: i64) -> Result<Vec<DrawRow>, DbError> {
    let rows = sqlx::query_as::<_, DrawRow>(
        "SELECT round, draw_date, \
                number1, number2, number3, number4, number5, number6, bonus_number, \
                created_at, updated_at \
         FROM lotto_draws \
         ORDER BY round DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
