use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if an env var value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if an env var value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    // Not every command opens a pool; absence is only an error at connect time.
    let database_url = lookup("DATABASE_URL").ok();

    let env = parse_environment(&or_default("LOTTODB_ENV", "development"));
    let log_level = or_default("LOTTODB_LOG_LEVEL", "info");

    let lotto_base_url = or_default("LOTTODB_LOTTO_BASE_URL", "https://www.dhlottery.co.kr")
        .trim_end_matches('/')
        .to_string();

    let db_max_connections = parse_u32("LOTTODB_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("LOTTODB_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("LOTTODB_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let crawler_request_timeout_secs = parse_u64("LOTTODB_CRAWLER_REQUEST_TIMEOUT_SECS", "30")?;
    let crawler_interactive_timeout_secs =
        parse_u64("LOTTODB_CRAWLER_INTERACTIVE_TIMEOUT_SECS", "10")?;
    let crawler_user_agent = or_default(
        "LOTTODB_CRAWLER_USER_AGENT",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
    );
    let crawler_max_attempts = parse_u32("LOTTODB_CRAWLER_MAX_ATTEMPTS", "3")?;
    let crawler_backoff_step_secs = parse_u64("LOTTODB_CRAWLER_BACKOFF_STEP_SECS", "5")?;
    let crawler_inter_round_delay_ms = parse_u64("LOTTODB_CRAWLER_INTER_ROUND_DELAY_MS", "1000")?;
    let crawler_inter_batch_delay_ms = parse_u64("LOTTODB_CRAWLER_INTER_BATCH_DELAY_MS", "1000")?;

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        lotto_base_url,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        crawler_request_timeout_secs,
        crawler_interactive_timeout_secs,
        crawler_user_agent,
        crawler_max_attempts,
        crawler_backoff_step_secs,
        crawler_inter_round_delay_ms,
        crawler_inter_batch_delay_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
