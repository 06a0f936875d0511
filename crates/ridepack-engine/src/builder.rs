//! Duration-window packing
//!
//! CRITICAL: packing must be deterministic. Every ordering used here is a
//! total order over `(duration_sec, id)` so identical inputs always produce
//! byte-identical packs.

use ridepack_core::{Candidate, DurationWindow, PackItem, PackResult};
use tracing::debug;

/// Pack candidates into the window, maximizing total duration without ever
/// exceeding the upper bound.
///
/// Priority order:
/// 1. A single candidate whose duration already lies inside the window is
///    selected alone (longest such candidate, ties by ascending id).
/// 2. Greedy accumulation in ascending `(duration_sec, id)` order.
/// 3. A local-improvement pass that swaps selected items for strictly
///    longer unselected ones while the total stays under the max, repeated
///    to a fixed point.
pub fn build(candidates: &[Candidate], window: &DurationWindow) -> PackResult {
    let mut pool: Vec<&Candidate> = candidates.iter().filter(|c| c.duration_sec > 0).collect();
    pool.sort_by(|a, b| {
        a.duration_sec
            .cmp(&b.duration_sec)
            .then_with(|| a.id.cmp(&b.id))
    });

    if pool.is_empty() {
        return PackResult::empty();
    }

    // Perfect single-item fit short-circuits: one video that fills the
    // window beats any multi-item combination of the same length.
    let mut perfect: Option<&Candidate> = None;
    for &candidate in &pool {
        if !window.contains(candidate.duration_sec) {
            continue;
        }
        match perfect {
            // Ascending iteration: replace only on strictly greater
            // duration, so equal durations keep the smallest id.
            Some(best) if candidate.duration_sec <= best.duration_sec => {}
            _ => perfect = Some(candidate),
        }
    }
    if let Some(single) = perfect {
        debug!(id = %single.id, duration_sec = single.duration_sec, "perfect single-item fit");
        return PackResult::from_items(vec![PackItem::from(single)], window);
    }

    let mut selection = greedy_pack(pool.iter().copied(), window.max_sec);
    refine(&mut selection, &pool, window.max_sec);

    let items = selection.into_iter().map(PackItem::from).collect();
    PackResult::from_items(items, window)
}

/// Greedy accumulation: walk candidates in the given order, adding each
/// item that still fits under the ceiling.
///
/// Shared by the pack builder and every selection strategy; the caller
/// controls the ordering, this loop never re-sorts.
pub(crate) fn greedy_pack<'a>(
    ordered: impl IntoIterator<Item = &'a Candidate>,
    max_sec: i64,
) -> Vec<&'a Candidate> {
    let mut picked = Vec::new();
    let mut total: i64 = 0;

    for candidate in ordered {
        if total + candidate.duration_sec <= max_sec {
            total += candidate.duration_sec;
            picked.push(candidate);
        }
    }

    picked
}

/// Swap selected items for strictly longer unselected ones while the total
/// stays within the ceiling. Applies the first improving swap found and
/// restarts; terminates because the total strictly increases and is bounded
/// by `max_sec`.
fn refine<'a>(selection: &mut Vec<&'a Candidate>, pool: &[&'a Candidate], max_sec: i64) {
    loop {
        let total: i64 = selection.iter().map(|c| c.duration_sec).sum();
        let mut swapped = false;

        'scan: for slot in 0..selection.len() {
            for &candidate in pool {
                if candidate.duration_sec <= selection[slot].duration_sec {
                    continue;
                }
                if selection.iter().any(|s| s.id == candidate.id) {
                    continue;
                }
                if total - selection[slot].duration_sec + candidate.duration_sec <= max_sec {
                    debug!(
                        swap_out = %selection[slot].id,
                        swap_in = %candidate.id,
                        "improving swap"
                    );
                    selection[slot] = candidate;
                    swapped = true;
                    break 'scan;
                }
            }
        }

        if !swapped {
            break;
        }
    }
}
