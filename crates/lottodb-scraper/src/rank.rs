//! Leaderboard finalization.

use crate::aggregate::StoreTally;

/// One persisted leaderboard record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedStore {
    pub store_name: String,
    pub address: String,
    pub region: String,
    pub wins_1st: u32,
    pub wins_2nd: u32,
    pub total_wins: u32,
    /// Dense 1-based rank; ties are never shared.
    pub rank: u32,
}

/// Orders tallies into the final ranked leaderboard.
///
/// Sorts by `total_wins` descending with a stable sort, so outlets tied on
/// totals keep their first-seen order (the order `tallies` arrives in), then
/// assigns dense 1-based ranks. Re-running over identical input reproduces
/// the exact same sequence.
#[must_use]
pub fn rank_stores(tallies: Vec<StoreTally>) -> Vec<RankedStore> {
    let mut ranked: Vec<RankedStore> = tallies
        .into_iter()
        .map(|t| {
            let total_wins = t.total_wins();
            RankedStore {
                store_name: t.store_name,
                address: t.address,
                region: t.region,
                wins_1st: t.wins_1st,
                wins_2nd: t.wins_2nd,
                total_wins,
                rank: 0,
            }
        })
        .collect();

    // Vec::sort_by_key is stable: equal totals keep insertion order.
    ranked.sort_by_key(|s| std::cmp::Reverse(s.total_wins));

    for (position, store) in ranked.iter_mut().enumerate() {
        store.rank = u32::try_from(position).unwrap_or(u32::MAX).saturating_add(1);
    }
    ranked
}

#[cfg(test)]
#[path = "rank_test.rs"]
mod tests;
