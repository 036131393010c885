pub mod aggregate;
pub mod client;
pub mod draw;
pub mod error;
pub mod harvest;
pub mod rank;
mod retry;
pub mod store_page;

pub use aggregate::{StoreKey, StoreTally, WinAggregator};
pub use client::LottoClient;
pub use draw::DrawResult;
pub use error::ScraperError;
pub use harvest::{CancelFlag, HarvestOptions, HarvestOutcome, HarvestReport};
pub use rank::{rank_stores, RankedStore};
pub use store_page::{parse_store_page, SaleMethod, StoreRow};
