use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("request timed out after {attempts} attempts: {source}")]
    Timeout {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("draw {round} is not published yet")]
    DrawNotPublished { round: u32 },

    #[error("draw {round} payload is malformed: {reason}")]
    MalformedDraw { round: u32, reason: String },

    #[error("invalid round range: start {start} is greater than end {end}")]
    InvalidRange { start: u32, end: u32 },
}

impl ScraperError {
    /// Whether this error is a network timeout, the only transient class
    /// retried by the fetch path. Every other transport or status failure is
    /// treated as persistent (malformed round, blocked IP, site change).
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            ScraperError::Timeout { .. } => true,
            ScraperError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
