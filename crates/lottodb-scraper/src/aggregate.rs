//! Cross-round win accumulation.
//!
//! The aggregator is an arena: tallies live in an insertion-ordered `Vec`
//! with a key → index map on the side. Insertion order is first-seen order,
//! which [`crate::rank`] relies on for its deterministic tie-break.

use std::collections::HashMap;

use crate::store_page::{extract_region, StoreRow};

/// Identity of one physical outlet across rounds: `name + "_" + address`,
/// verbatim. Same name at a different address is a different outlet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey(String);

impl StoreKey {
    #[must_use]
    pub fn new(name: &str, address: &str) -> Self {
        Self(format!("{name}_{address}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Running win counts for one outlet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreTally {
    pub store_name: String,
    pub address: String,
    pub region: String,
    pub wins_1st: u32,
    /// Second-tier wins come from a feed this crawler does not produce;
    /// always 0 here, carried through to keep the persisted shape complete.
    pub wins_2nd: u32,
}

impl StoreTally {
    #[must_use]
    pub fn total_wins(&self) -> u32 {
        self.wins_1st + self.wins_2nd
    }
}

/// Accumulates first-prize wins per outlet over one harvest invocation.
///
/// State lives only for the run: every invocation starts from an empty map,
/// so totals cover exactly the requested round range (overlapping ranges
/// across invocations double-count by design; callers pick disjoint ranges).
#[derive(Debug, Default)]
pub struct WinAggregator {
    index: HashMap<StoreKey, usize>,
    entries: Vec<StoreTally>,
}

impl WinAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one parsed table row into the running state.
    ///
    /// First sighting of a key inserts a tally with `wins_1st = 1`; every
    /// later sighting increments it. A row listed twice within one round's
    /// table is counted twice — the source system never deduplicated within
    /// a round, and totals must match it.
    pub fn record(&mut self, row: &StoreRow) {
        let key = StoreKey::new(&row.name, &row.address);
        if let Some(&slot) = self.index.get(&key) {
            self.entries[slot].wins_1st += 1;
            return;
        }

        self.index.insert(key, self.entries.len());
        self.entries.push(StoreTally {
            store_name: row.name.clone(),
            address: row.address.clone(),
            region: extract_region(&row.address),
            wins_1st: 1,
            wins_2nd: 0,
        });
    }

    /// Number of distinct outlets seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current tally for a key, if seen.
    #[must_use]
    pub fn get(&self, key: &StoreKey) -> Option<&StoreTally> {
        self.index.get(key).map(|&slot| &self.entries[slot])
    }

    /// Consumes the aggregator, yielding tallies in first-seen order.
    #[must_use]
    pub fn into_tallies(self) -> Vec<StoreTally> {
        self.entries
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
