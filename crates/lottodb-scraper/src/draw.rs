//! Draw-result payload for the operator's `getLottoNumber` JSON endpoint.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ScraperError;

/// Raw JSON body returned by `common.do?method=getLottoNumber&drwNo={round}`.
///
/// The endpoint answers `returnValue: "fail"` (with every other field absent)
/// for rounds that have not been drawn yet.
#[derive(Debug, Deserialize)]
pub(crate) struct DrawPayload {
    #[serde(rename = "returnValue")]
    pub return_value: String,
    #[serde(rename = "drwNo")]
    pub round: Option<u32>,
    #[serde(rename = "drwNoDate")]
    pub draw_date: Option<String>,
    #[serde(rename = "drwtNo1")]
    pub no1: Option<u8>,
    #[serde(rename = "drwtNo2")]
    pub no2: Option<u8>,
    #[serde(rename = "drwtNo3")]
    pub no3: Option<u8>,
    #[serde(rename = "drwtNo4")]
    pub no4: Option<u8>,
    #[serde(rename = "drwtNo5")]
    pub no5: Option<u8>,
    #[serde(rename = "drwtNo6")]
    pub no6: Option<u8>,
    #[serde(rename = "bnusNo")]
    pub bonus: Option<u8>,
}

/// One round's winning numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawResult {
    pub round: u32,
    pub draw_date: Option<NaiveDate>,
    /// The six main numbers, in the order the site publishes them.
    pub numbers: [u8; 6],
    pub bonus: u8,
}

impl DrawPayload {
    /// Converts the raw payload into a [`DrawResult`].
    ///
    /// `requested_round` is the round number used in the request, reported in
    /// errors when the payload itself carries none.
    pub(crate) fn into_result(self, requested_round: u32) -> Result<DrawResult, ScraperError> {
        if self.return_value != "success" {
            return Err(ScraperError::DrawNotPublished {
                round: requested_round,
            });
        }

        let round = self.round.unwrap_or(requested_round);
        let malformed = |reason: &str| ScraperError::MalformedDraw {
            round,
            reason: reason.to_owned(),
        };

        let numbers = [
            self.no1.ok_or_else(|| malformed("missing drwtNo1"))?,
            self.no2.ok_or_else(|| malformed("missing drwtNo2"))?,
            self.no3.ok_or_else(|| malformed("missing drwtNo3"))?,
            self.no4.ok_or_else(|| malformed("missing drwtNo4"))?,
            self.no5.ok_or_else(|| malformed("missing drwtNo5"))?,
            self.no6.ok_or_else(|| malformed("missing drwtNo6"))?,
        ];
        if numbers.iter().any(|n| !(1..=45).contains(n)) {
            return Err(malformed("main number outside 1..=45"));
        }

        let bonus = self.bonus.ok_or_else(|| malformed("missing bnusNo"))?;
        if !(1..=45).contains(&bonus) {
            return Err(malformed("bonus number outside 1..=45"));
        }

        // drwNoDate is "YYYY-MM-DD"; a missing or unparsable date is not
        // worth failing the whole round over.
        let draw_date = self
            .draw_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        Ok(DrawResult {
            round,
            draw_date,
            numbers,
            bonus,
        })
    }
}

#[cfg(test)]
#[path = "draw_test.rs"]
mod tests;
