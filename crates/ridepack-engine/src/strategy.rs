//! Multi-strategy duration-fit selection
//!
//! Runs independent packing heuristics against the same de-duplicated pool
//! and picks the winner through an ordered tie-break chain. All strategies
//! share the greedy accumulation loop from the builder; only the candidate
//! ordering differs.

use std::collections::HashSet;

use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;

use ridepack_core::Candidate;

use crate::builder::greedy_pack;

/// A packing heuristic. Declaration order doubles as the final tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    LongestFirst,
    ShortestFirst,
    CreatorAware,
    RecencyFirst,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::LongestFirst,
        Strategy::ShortestFirst,
        Strategy::CreatorAware,
        Strategy::RecencyFirst,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::LongestFirst => "longest-first",
            Strategy::ShortestFirst => "shortest-first",
            Strategy::CreatorAware => "creator-aware",
            Strategy::RecencyFirst => "recency-first",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Winning selection across all strategies.
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    pub items: Vec<Candidate>,
    pub total_sec: i64,
    pub strategy: Strategy,
}

impl Selection {
    fn distinct_channels(&self) -> usize {
        self.items
            .iter()
            .map(|c| c.channel_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    fn latest_published(&self) -> Option<OffsetDateTime> {
        self.items.iter().filter_map(|c| c.published_at).max()
    }
}

/// Run every strategy against the pool and keep the best outcome.
///
/// The ceiling allows overbooking up to `overbook_pct` above
/// `remaining_seconds`; no strategy may exceed it. Candidates are
/// de-duplicated by id first, keeping the first occurrence in input order.
pub fn select(candidates: &[Candidate], remaining_seconds: i64, overbook_pct: u8) -> Selection {
    let pool = dedup_by_id(candidates);
    let ceiling = remaining_seconds + remaining_seconds * i64::from(overbook_pct) / 100;

    let mut outcomes = Strategy::ALL.iter().map(|&strategy| {
        let picked = run_strategy(strategy, &pool, ceiling);
        let total_sec = picked.iter().map(|c| c.duration_sec).sum();
        Selection {
            items: picked.into_iter().cloned().collect(),
            total_sec,
            strategy,
        }
    });

    // First strategy seeds the fold; ALL is non-empty by construction.
    let first = outcomes.next().unwrap_or(Selection {
        items: Vec::new(),
        total_sec: 0,
        strategy: Strategy::LongestFirst,
    });
    let winner = outcomes.fold(first, |incumbent, challenger| {
        if beats(&challenger, &incumbent) {
            challenger
        } else {
            incumbent
        }
    });

    debug!(
        strategy = %winner.strategy,
        total_sec = winner.total_sec,
        items = winner.items.len(),
        "strategy selection"
    );
    winner
}

/// Ordered tie-break chain: total duration, channel diversity, recency.
/// A challenger only displaces the incumbent by strictly winning one of
/// them, so full ties resolve to the earlier-declared strategy.
fn beats(challenger: &Selection, incumbent: &Selection) -> bool {
    if challenger.total_sec != incumbent.total_sec {
        return challenger.total_sec > incumbent.total_sec;
    }
    let (ch, inc) = (challenger.distinct_channels(), incumbent.distinct_channels());
    if ch != inc {
        return ch > inc;
    }
    let (ch, inc) = (challenger.latest_published(), incumbent.latest_published());
    if ch != inc {
        return ch > inc;
    }
    false
}

fn dedup_by_id(candidates: &[Candidate]) -> Vec<&Candidate> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .filter(|c| c.duration_sec > 0)
        .filter(|c| seen.insert(c.id.as_str()))
        .collect()
}

fn run_strategy<'a>(strategy: Strategy, pool: &[&'a Candidate], ceiling: i64) -> Vec<&'a Candidate> {
    match strategy {
        Strategy::LongestFirst => {
            let mut ordered = pool.to_vec();
            ordered.sort_by(|a, b| {
                b.duration_sec
                    .cmp(&a.duration_sec)
                    .then_with(|| a.id.cmp(&b.id))
            });
            greedy_pack(ordered, ceiling)
        }
        Strategy::ShortestFirst => {
            let mut ordered = pool.to_vec();
            ordered.sort_by(|a, b| {
                a.duration_sec
                    .cmp(&b.duration_sec)
                    .then_with(|| a.id.cmp(&b.id))
            });
            greedy_pack(ordered, ceiling)
        }
        Strategy::CreatorAware => creator_aware_pack(pool, ceiling),
        Strategy::RecencyFirst => {
            let mut ordered = pool.to_vec();
            // Missing timestamps sort last.
            ordered.sort_by(|a, b| {
                b.published_at
                    .cmp(&a.published_at)
                    .then_with(|| a.id.cmp(&b.id))
            });
            greedy_pack(ordered, ceiling)
        }
    }
}

/// Greedy packing that prefers the next fitting item from a channel not yet
/// represented in the selection, falling back to plain duration order once
/// every fitting item's channel is already covered.
fn creator_aware_pack<'a>(pool: &[&'a Candidate], ceiling: i64) -> Vec<&'a Candidate> {
    let mut ordered = pool.to_vec();
    ordered.sort_by(|a, b| {
        b.duration_sec
            .cmp(&a.duration_sec)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut picked: Vec<&Candidate> = Vec::new();
    let mut picked_ids: HashSet<&str> = HashSet::new();
    let mut channels: HashSet<&str> = HashSet::new();
    let mut total: i64 = 0;

    loop {
        let fresh_channel = ordered.iter().find(|c| {
            !picked_ids.contains(c.id.as_str())
                && total + c.duration_sec <= ceiling
                && !channels.contains(c.channel_id.as_str())
        });
        let next = fresh_channel.or_else(|| {
            ordered
                .iter()
                .find(|c| !picked_ids.contains(c.id.as_str()) && total + c.duration_sec <= ceiling)
        });

        match next {
            Some(&candidate) => {
                total += candidate.duration_sec;
                picked_ids.insert(candidate.id.as_str());
                channels.insert(candidate.channel_id.as_str());
                picked.push(candidate);
            }
            None => break,
        }
    }

    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn candidate(id: &str, channel: &str, duration: i64) -> Candidate {
        Candidate::new(id, channel, duration, "rust")
    }

    #[test]
    fn test_ceiling_allows_three_percent_overbook() {
        // remaining 1000 -> ceiling 1030; a single 1020s video fits.
        let pool = vec![candidate("v1", "ch1", 1020)];
        let selection = select(&pool, 1000, 3);
        assert_eq!(selection.total_sec, 1020);

        let pool = vec![candidate("v1", "ch1", 1031)];
        let selection = select(&pool, 1000, 3);
        assert!(selection.items.is_empty());
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let pool = vec![
            candidate("v1", "ch1", 300),
            candidate("v1", "ch2", 900),
            candidate("v2", "ch3", 200),
        ];
        let selection = select(&pool, 600, 3);
        let v1 = selection.items.iter().find(|c| c.id == "v1").unwrap();
        assert_eq!(v1.channel_id, "ch1");
        assert_eq!(v1.duration_sec, 300);
    }

    #[test]
    fn test_longest_first_wins_on_total() {
        // longest-first packs 500+400 = 900; shortest-first packs
        // 100+200+400 = 700 then stalls under the 927 ceiling.
        let pool = vec![
            candidate("a", "ch1", 100),
            candidate("b", "ch2", 200),
            candidate("c", "ch3", 400),
            candidate("d", "ch4", 500),
        ];
        let selection = select(&pool, 900, 3);
        assert_eq!(selection.total_sec, 900);
        assert_eq!(selection.strategy, Strategy::LongestFirst);
    }

    #[test]
    fn test_channel_diversity_breaks_total_tie() {
        // longest-first and creator-aware both reach exactly 600, but
        // longest-first stays inside ch1; creator-aware spreads across two
        // channels and wins the diversity tie-break.
        let pool = vec![
            candidate("a", "ch1", 400),
            candidate("b", "ch1", 200),
            candidate("c", "ch2", 200),
        ];
        let selection = select(&pool, 600, 0);
        assert_eq!(selection.total_sec, 600);

        let channels: HashSet<&str> = selection
            .items
            .iter()
            .map(|c| c.channel_id.as_str())
            .collect();
        assert_eq!(channels.len(), 2);
        assert_eq!(selection.strategy, Strategy::CreatorAware);
    }

    #[test]
    fn test_full_tie_resolves_to_earlier_declared_strategy() {
        // Four distinct channels: every heuristic selects all four items
        // and ties on every criterion, so longest-first wins by order.
        let pool = vec![
            candidate("a", "ch1", 300),
            candidate("b", "ch2", 250),
            candidate("c", "ch3", 200),
            candidate("d", "ch4", 150),
        ];
        let selection = select(&pool, 900, 0);
        assert_eq!(selection.total_sec, 900);
        assert_eq!(selection.strategy, Strategy::LongestFirst);
    }

    #[test]
    fn test_recency_breaks_remaining_ties() {
        // Every heuristic packs one 300s pair; duration-ordered strategies
        // land on the a-pair (id order), recency-first on the newer z-pair.
        // Totals and channel counts tie, so recency decides.
        let pool = vec![
            candidate("a1", "ch1", 300).with_published_at(datetime!(2023-01-01 0:00 UTC)),
            candidate("a2", "ch2", 300).with_published_at(datetime!(2023-02-01 0:00 UTC)),
            candidate("z1", "ch3", 300).with_published_at(datetime!(2025-01-01 0:00 UTC)),
            candidate("z2", "ch4", 300).with_published_at(datetime!(2025-02-01 0:00 UTC)),
        ];
        let selection = select(&pool, 600, 0);
        assert_eq!(selection.total_sec, 600);
        assert_eq!(selection.strategy, Strategy::RecencyFirst);
        assert!(selection.items.iter().any(|c| c.id == "z2"));
    }

    #[test]
    fn test_creator_aware_prefers_unrepresented_channels() {
        let pool = vec![
            candidate("a", "ch1", 400),
            candidate("b", "ch1", 300),
            candidate("c", "ch2", 250),
        ];
        let picked = creator_aware_pack(
            &pool.iter().collect::<Vec<_>>(),
            700,
        );
        // 400 (ch1) then 250 (ch2, fresh channel) even though 300 (ch1)
        // is longer.
        let ids: Vec<&str> = picked.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_empty_pool_returns_empty_selection() {
        let selection = select(&[], 600, 3);
        assert!(selection.items.is_empty());
        assert_eq!(selection.total_sec, 0);
    }

    #[test]
    fn test_malformed_durations_never_selected() {
        let pool = vec![candidate("bad", "ch1", -30), candidate("ok", "ch2", 300)];
        let selection = select(&pool, 600, 3);
        assert_eq!(selection.items.len(), 1);
        assert_eq!(selection.items[0].id, "ok");
    }

    #[test]
    fn test_selection_is_deterministic() {
        let pool = vec![
            candidate("a", "ch1", 310),
            candidate("b", "ch2", 290),
            candidate("c", "ch1", 150),
            candidate("d", "ch3", 480),
        ];
        let first = select(&pool, 800, 3);
        for _ in 0..10 {
            let again = select(&pool, 800, 3);
            assert_eq!(first.total_sec, again.total_sec);
            assert_eq!(first.strategy, again.strategy);
            let ids: Vec<&str> = first.items.iter().map(|c| c.id.as_str()).collect();
            let again_ids: Vec<&str> = again.items.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids, again_ids);
        }
    }
}
