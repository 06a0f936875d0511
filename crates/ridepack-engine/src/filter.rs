//! Candidate filtering - hard constraints applied before packing

use ridepack_core::{Candidate, PackRequest};
use tracing::debug;

/// Drop every candidate that fails a hard constraint.
///
/// Keeps items that match the requested topic (exact, case-insensitive, or
/// via tag membership), have a positive duration, and are neither excluded
/// by id nor blocked by channel. When the request names a target
/// difficulty, non-matching levels are dropped too; relaxing that filter on
/// an empty result is the caller's policy, not this function's.
pub fn filter(candidates: &[Candidate], request: &PackRequest) -> Vec<Candidate> {
    let mut kept = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        if candidate.duration_sec <= 0 {
            debug!(
                id = %candidate.id,
                duration_sec = candidate.duration_sec,
                "dropping candidate with non-positive duration"
            );
            continue;
        }
        if !candidate.matches_topic(&request.topic) {
            continue;
        }
        if request.excluded_ids.contains(&candidate.id) {
            continue;
        }
        if request.blocked_channel_ids.contains(&candidate.channel_id) {
            continue;
        }
        if let Some(level) = request.target_difficulty {
            if candidate.difficulty != level {
                continue;
            }
        }
        kept.push(candidate.clone());
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use ridepack_core::{Difficulty, DurationWindow};

    fn request(topic: &str) -> PackRequest {
        PackRequest::new(topic, DurationWindow::new(300, 600).unwrap())
    }

    fn candidate(id: &str, channel: &str, duration: i64, topic: &str) -> Candidate {
        Candidate::new(id, channel, duration, topic)
    }

    #[test]
    fn test_filter_drops_wrong_topic() {
        let pool = vec![
            candidate("v1", "ch1", 300, "rust"),
            candidate("v2", "ch1", 300, "go"),
        ];
        let kept = filter(&pool, &request("rust"));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "v1");
    }

    #[test]
    fn test_filter_topic_is_case_insensitive() {
        let pool = vec![candidate("v1", "ch1", 300, "Rust")];
        assert_eq!(filter(&pool, &request("rUsT")).len(), 1);
    }

    #[test]
    fn test_filter_drops_non_positive_durations() {
        let pool = vec![
            candidate("v1", "ch1", 0, "rust"),
            candidate("v2", "ch1", -100, "rust"),
            candidate("v3", "ch1", 400, "rust"),
        ];
        let kept = filter(&pool, &request("rust"));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "v3");
    }

    #[test]
    fn test_filter_respects_exclusions_and_blocks() {
        let pool = vec![
            candidate("v1", "ch1", 300, "rust"),
            candidate("v2", "blocked", 300, "rust"),
            candidate("v3", "ch2", 300, "rust"),
        ];
        let req = request("rust")
            .with_excluded_ids(["v1".to_string()].into())
            .with_blocked_channels(["blocked".to_string()].into());

        let kept = filter(&pool, &req);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "v3");
    }

    #[test]
    fn test_filter_difficulty_is_opt_in() {
        let pool = vec![
            candidate("v1", "ch1", 300, "rust").with_difficulty(Difficulty::Beginner),
            candidate("v2", "ch1", 300, "rust").with_difficulty(Difficulty::Advanced),
        ];

        let relaxed = filter(&pool, &request("rust"));
        assert_eq!(relaxed.len(), 2);

        let strict = filter(&pool, &request("rust").with_difficulty(Difficulty::Advanced));
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].id, "v2");
    }

    #[test]
    fn test_filter_matches_via_tags() {
        let pool = vec![
            candidate("v1", "ch1", 300, "systems").with_tags(vec!["rust".to_string()]),
        ];
        assert_eq!(filter(&pool, &request("rust")).len(), 1);
    }
}
