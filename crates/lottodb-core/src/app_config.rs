#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Only commands that open a database pool need this; crawl-only paths
    /// (e.g. dry runs) work without it.
    pub database_url: Option<String>,
    pub env: Environment,
    pub log_level: String,
    /// Origin of the lottery operator's site, no trailing slash.
    pub lotto_base_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Timeout for batch crawl fetches, where a stalled site is worth waiting out.
    pub crawler_request_timeout_secs: u64,
    /// Shorter timeout for one-off interactive fetches.
    pub crawler_interactive_timeout_secs: u64,
    pub crawler_user_agent: String,
    /// Total fetch attempts for one round, first try included.
    pub crawler_max_attempts: u32,
    /// Linear backoff step: the n-th retry waits `n * step` seconds.
    pub crawler_backoff_step_secs: u64,
    pub crawler_inter_round_delay_ms: u64,
    pub crawler_inter_batch_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &self.database_url.as_ref().map(|_| "[redacted]"))
            .field("lotto_base_url", &self.lotto_base_url)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "crawler_request_timeout_secs",
                &self.crawler_request_timeout_secs,
            )
            .field(
                "crawler_interactive_timeout_secs",
                &self.crawler_interactive_timeout_secs,
            )
            .field("crawler_user_agent", &self.crawler_user_agent)
            .field("crawler_max_attempts", &self.crawler_max_attempts)
            .field("crawler_backoff_step_secs", &self.crawler_backoff_step_secs)
            .field(
                "crawler_inter_round_delay_ms",
                &self.crawler_inter_round_delay_ms,
            )
            .field(
                "crawler_inter_batch_delay_ms",
                &self.crawler_inter_batch_delay_ms,
            )
            .finish()
    }
}
