//! HTTP client for the lottery operator's public result pages.

use std::time::Duration;

use reqwest::Client;

use crate::draw::{DrawPayload, DrawResult};
use crate::error::ScraperError;
use crate::retry::retry_on_timeout;

/// Query string selecting the Lotto 6/45 winning-store listing.
const STORE_PAGE_QUERY: &str = "store.do?method=topStore&pageGubun=L645";

/// HTTP client for the operator's two public endpoints: the winning-store
/// HTML page and the `getLottoNumber` JSON API.
///
/// Store pages are served in the site's legacy EUC-KR encoding and are decoded
/// with a fixed codec — charset negotiation or sniffing is deliberately not
/// attempted, because a wrong decode silently corrupts every store name.
///
/// Timeouts are retried with a linear backoff up to `max_attempts` total
/// tries; any other transport or status failure is returned immediately.
pub struct LottoClient {
    client: Client,
    base_url: String,
    /// Total fetch attempts, first try included.
    max_attempts: u32,
    /// Linear backoff step in seconds between timed-out attempts.
    backoff_step_secs: u64,
}

impl LottoClient {
    /// Creates a `LottoClient` with configured timeout, `User-Agent`, and
    /// retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_attempts: u32,
        backoff_step_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            max_attempts,
            backoff_step_secs,
        })
    }

    /// Fetches the winning-store page for `round`, or the current listing
    /// when `round` is `None`, and returns the EUC-KR-decoded markup.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Timeout`] — every attempt timed out.
    /// - [`ScraperError::UnexpectedStatus`] — non-2xx status (not retried).
    /// - [`ScraperError::Http`] — non-timeout transport failure (not retried).
    pub async fn fetch_store_page(&self, round: Option<u32>) -> Result<String, ScraperError> {
        let url = self.store_page_url(round);

        retry_on_timeout(self.max_attempts, self.backoff_step_secs, || {
            let url = url.clone();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let bytes = response.bytes().await?;
                let (text, _, _) = encoding_rs::EUC_KR.decode(&bytes);
                Ok(text.into_owned())
            }
        })
        .await
    }

    /// Fetches the winning numbers for `round` from the JSON endpoint.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::DrawNotPublished`] — the round has no result yet.
    /// - [`ScraperError::MalformedDraw`] — payload is missing fields or the
    ///   numbers are out of range.
    /// - [`ScraperError::Deserialize`] — body is not valid JSON.
    /// - Fetch errors as in [`Self::fetch_store_page`].
    pub async fn fetch_draw(&self, round: u32) -> Result<DrawResult, ScraperError> {
        let payload = self.fetch_draw_payload(&round.to_string()).await?;
        payload.into_result(round)
    }

    /// Discovers the current latest round number.
    ///
    /// Calling the JSON endpoint with an empty `drwNo` returns the most
    /// recent published draw.
    ///
    /// # Errors
    ///
    /// Same fetch and deserialization errors as [`Self::fetch_draw`], plus
    /// [`ScraperError::MalformedDraw`] when the payload carries no round
    /// number.
    pub async fn fetch_latest_round(&self) -> Result<u32, ScraperError> {
        let payload = self.fetch_draw_payload("").await?;
        if payload.return_value != "success" {
            return Err(ScraperError::DrawNotPublished { round: 0 });
        }
        payload.round.ok_or_else(|| ScraperError::MalformedDraw {
            round: 0,
            reason: "latest-draw payload has no drwNo".to_owned(),
        })
    }

    async fn fetch_draw_payload(&self, drw_no: &str) -> Result<DrawPayload, ScraperError> {
        let url = format!(
            "{}/common.do?method=getLottoNumber&drwNo={drw_no}",
            self.base_url
        );

        retry_on_timeout(self.max_attempts, self.backoff_step_secs, || {
            let url = url.clone();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<DrawPayload>(&body).map_err(|e| {
                    ScraperError::Deserialize {
                        context: format!("draw payload from {url}"),
                        source: e,
                    }
                })
            }
        })
        .await
    }

    fn store_page_url(&self, round: Option<u32>) -> String {
        match round {
            Some(round) => format!("{}/{STORE_PAGE_QUERY}&drwNo={round}", self.base_url),
            None => format!("{}/{STORE_PAGE_QUERY}", self.base_url),
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
