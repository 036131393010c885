//! Retry helper for round fetches.
//!
//! Only network timeouts are retried: the target site occasionally stalls
//! under load but recovers within seconds, while any other failure (HTTP
//! error status, connection refused, DNS) is almost always persistent for a
//! given round and retrying would just hammer the site.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Executes `operation` up to `max_attempts` times, retrying only on
/// timeouts, with a linearly increasing delay between attempts.
///
/// The wait after the n-th failed attempt (1-based) is `n * backoff_step_secs`
/// seconds, so with the default step of 5s the schedule is 5s, 10s.
///
/// On exhaustion the final timeout is wrapped in [`ScraperError::Timeout`]
/// carrying the attempt count. Non-timeout errors are returned immediately.
pub(crate) async fn retry_on_timeout<T, F, Fut>(
    max_attempts: u32,
    backoff_step_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_timeout() => {
                if attempt >= max_attempts {
                    return Err(match err {
                        ScraperError::Http(source) => ScraperError::Timeout {
                            attempts: max_attempts,
                            source,
                        },
                        other => other,
                    });
                }
                let delay_secs = u64::from(attempt).saturating_mul(backoff_step_secs);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_secs,
                    error = %err,
                    "fetch timed out — retrying after backoff"
                );
                tokio::time::sleep(Duration::from_secs(delay_secs)).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
