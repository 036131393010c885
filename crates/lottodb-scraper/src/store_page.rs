//! Parser for the winning-store listing page.
//!
//! The page stacks one `.group_content` block per prize tier; the first block
//! in document order is the first-prize table and is the only one consumed.
//! The markup is an external contract that changes without notice, so the
//! parser never hard-fails: a page that doesn't match yields zero rows.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static PRIZE_BLOCK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".group_content").expect("static selector"));
static TABLE_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table tbody tr").expect("static selector"));
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("static selector"));

/// Substrings that mark a "store name" as a swallowed link rather than a real
/// retail outlet — an artifact of the site's markup, not data.
const INVALID_NAME_FRAGMENTS: &[&str] = &[
    "http://", "https://", ".co.kr", ".com", ".net", "dhlottery", "www.", "://",
];

/// Administrative-division suffixes that are printed as a separate second
/// token and belong to the region name (e.g. `서울 특별시` → `서울특별시`).
const ADMIN_SUFFIXES: &[&str] = &["특별시", "광역시", "특별자치시", "특별자치도"];

/// Province names the site abbreviates to two syllables; completed to their
/// `…도` form so leaderboard region grouping stays consistent.
const PROVINCE_SHORT_NAMES: &[&str] = &[
    "경기", "강원", "충북", "충남", "전북", "전남", "경북", "경남",
];

/// Region used when an address is empty or yields no tokens.
pub const REGION_FALLBACK: &str = "기타";

/// How the winning ticket was picked, as printed in the listing.
///
/// Informational only; it plays no part in aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleMethod {
    Manual,
    Auto,
    Unknown,
}

impl SaleMethod {
    fn from_label(label: &str) -> Self {
        match label.trim() {
            "수동" => SaleMethod::Manual,
            "자동" | "반자동" => SaleMethod::Auto,
            _ => SaleMethod::Unknown,
        }
    }
}

/// One row of the first-prize table, as printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRow {
    /// Position column as printed; not validated, not used downstream.
    pub position: String,
    pub name: String,
    pub method: SaleMethod,
    pub address: String,
}

/// Extracts the first-prize store rows from a fetched listing page.
///
/// Rows are dropped silently when structurally short (fewer than 4 cells) and
/// with a log line when the name fails the validity filter. An empty result
/// is a valid outcome: either the page structure didn't match or the round
/// genuinely listed no stores.
#[must_use]
pub fn parse_store_page(html: &str) -> Vec<StoreRow> {
    let document = Html::parse_document(html);

    let Some(first_prize_block) = document.select(&PRIZE_BLOCK).next() else {
        tracing::warn!("store page has no prize block — markup changed or empty page");
        return Vec::new();
    };

    let mut rows = Vec::new();
    for row in first_prize_block.select(&TABLE_ROW) {
        let cells: Vec<String> = row.select(&CELL).map(cell_text).collect();
        // position, name, method, address; a trailing map-link cell may follow.
        if cells.len() < 4 {
            continue;
        }

        let name = cells[1].clone();
        if is_invalid_store_name(&name) {
            tracing::debug!(name = %name, "skipping row with invalid store name");
            continue;
        }

        rows.push(StoreRow {
            position: cells[0].clone(),
            name,
            method: SaleMethod::from_label(&cells[2]),
            address: cells[3].clone(),
        });
    }
    rows
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_owned()
}

/// Rejects empty, single-character, and URL-shaped names.
pub(crate) fn is_invalid_store_name(name: &str) -> bool {
    if name.chars().count() < 2 {
        return true;
    }
    let lower = name.to_lowercase();
    INVALID_NAME_FRAGMENTS
        .iter()
        .any(|fragment| lower.contains(fragment))
}

/// Derives the region label from a store address.
///
/// The first whitespace token is the base region. A second token that is an
/// administrative suffix is folded in; bare province abbreviations are
/// completed to their `…도` form.
#[must_use]
pub fn extract_region(address: &str) -> String {
    let mut tokens = address.split_whitespace();
    let Some(base) = tokens.next() else {
        return REGION_FALLBACK.to_owned();
    };

    if let Some(second) = tokens.next() {
        if ADMIN_SUFFIXES.contains(&second) {
            return format!("{base}{second}");
        }
    }

    if !base.ends_with('도')
        && (PROVINCE_SHORT_NAMES.contains(&base) || base.contains('도'))
    {
        return format!("{base}도");
    }

    base.to_owned()
}

#[cfg(test)]
#[path = "store_page_test.rs"]
mod tests;
