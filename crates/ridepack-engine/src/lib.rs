//! Duration-constrained selection engine for ridepack
//!
//! This crate contains:
//! - Candidate filter (hard constraints)
//! - Pack builder (greedy packing + local-improvement refinement)
//! - Strategy selector (multi-heuristic duration fit)
//! - Difficulty adjuster (mastery-driven bumping)
//!
//! Everything here is pure and synchronous: no I/O, no shared state, no
//! retries. Degraded outcomes flow through `PackResult::under_filled` or an
//! empty result; only broken preconditions return errors.

pub mod adjust;
pub mod builder;
pub mod filter;
pub mod rng;
pub mod strategy;

pub use adjust::{MasteryThresholds, adjust};
pub use builder::build;
pub use filter::filter;
pub use rng::SeededRng;
pub use strategy::{Selection, Strategy, select};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ridepack_core::{
    Candidate, Difficulty, DurationWindow, Error, PackRequest, PackResult, Result,
};

/// Engine tunables. All policy numbers live here (or in the file-backed
/// config that mirrors this struct), never inline at call sites.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// ± band around the requested duration for playlist windows.
    pub tolerance_pct: u8,
    /// Ceiling slack above remaining time for the strategy selector.
    pub overbook_pct: u8,
    pub mastery: MasteryThresholds,
    /// Accepted playlist request durations, in seconds.
    pub min_request_sec: i64,
    pub max_request_sec: i64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            tolerance_pct: 7,
            overbook_pct: 3,
            mastery: MasteryThresholds::default(),
            min_request_sec: 300,
            max_request_sec: 3600,
        }
    }
}

/// Parameters for a topic playlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistRequest {
    pub topic: String,
    pub duration_sec: i64,
    #[serde(default)]
    pub target_difficulty: Option<Difficulty>,
    #[serde(default)]
    pub excluded_ids: HashSet<String>,
    #[serde(default)]
    pub blocked_channel_ids: HashSet<String>,
}

impl PlaylistRequest {
    pub fn new(topic: impl Into<String>, duration_sec: i64) -> Self {
        Self {
            topic: topic.into(),
            duration_sec,
            target_difficulty: None,
            excluded_ids: HashSet::new(),
            blocked_channel_ids: HashSet::new(),
        }
    }
}

/// Parameters for a general duration-fit recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub remaining_seconds: i64,
    #[serde(default)]
    pub exclude_ids: HashSet<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

/// Parameters for the wizard flow (difficulty/mastery aware).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardRequest {
    pub topic: String,
    pub commute_duration_sec: i64,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub excluded_ids: HashSet<String>,
    #[serde(default)]
    pub blocked_channel_ids: HashSet<String>,
}

/// Wizard result: the pack plus how difficulty was resolved.
#[derive(Debug, Clone, Serialize)]
pub struct WizardOutcome {
    pub pack: PackResult,
    pub final_difficulty: Difficulty,
    pub difficulty_adjusted: bool,
}

/// The selection engine. Stateless; one instance serves any number of
/// concurrent invocations.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    options: EngineOptions,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Build a playlist for a topic fitting `duration_sec ± tolerance`.
    ///
    /// An empty candidate pool is not an error: the result comes back empty
    /// and under-filled, and the caller decides how to present it. Only an
    /// out-of-range requested duration fails.
    pub fn topic_playlist(
        &self,
        candidates: &[Candidate],
        request: &PlaylistRequest,
    ) -> Result<PackResult> {
        if request.duration_sec < self.options.min_request_sec
            || request.duration_sec > self.options.max_request_sec
        {
            return Err(Error::InvalidRequest(format!(
                "duration {}s outside accepted range [{}, {}]",
                request.duration_sec, self.options.min_request_sec, self.options.max_request_sec
            )));
        }

        let window = DurationWindow::around(request.duration_sec, self.options.tolerance_pct)?;
        let mut pack_request = PackRequest::new(&request.topic, window)
            .with_excluded_ids(request.excluded_ids.clone())
            .with_blocked_channels(request.blocked_channel_ids.clone());
        pack_request.target_difficulty = request.target_difficulty;

        let pool = self.filtered_pool(candidates, &mut pack_request);
        Ok(build(&pool, &window))
    }

    /// Duration-fit recommendation across all strategies.
    pub fn recommend(
        &self,
        candidates: &[Candidate],
        request: &RecommendRequest,
    ) -> Result<Selection> {
        if request.remaining_seconds <= 0 {
            return Err(Error::InvalidRequest(format!(
                "remaining seconds must be positive, got {}",
                request.remaining_seconds
            )));
        }

        let pool: Vec<Candidate> = candidates
            .iter()
            .filter(|c| c.duration_sec > 0)
            .filter(|c| !request.exclude_ids.contains(&c.id))
            .filter(|c| {
                request
                    .topic
                    .as_deref()
                    .is_none_or(|topic| c.matches_topic(topic))
            })
            .cloned()
            .collect();

        Ok(select(
            &pool,
            request.remaining_seconds,
            self.options.overbook_pct,
        ))
    }

    /// Wizard playlist: resolve difficulty from mastery first, then pack
    /// with the same tolerance window as `topic_playlist`.
    ///
    /// `mastery_score` is the caller-supplied count of prior watched items
    /// for this topic (an injected snapshot, never read from shared state).
    pub fn wizard_playlist(
        &self,
        candidates: &[Candidate],
        request: &WizardRequest,
        mastery_score: u32,
    ) -> Result<WizardOutcome> {
        let base = request.difficulty.unwrap_or_default();
        let final_difficulty = adjust(base, mastery_score, &self.options.mastery);
        if final_difficulty != base {
            info!(
                topic = %request.topic,
                %base,
                adjusted = %final_difficulty,
                mastery_score,
                "difficulty bumped from mastery"
            );
        }

        let playlist = PlaylistRequest {
            topic: request.topic.clone(),
            duration_sec: request.commute_duration_sec,
            target_difficulty: Some(final_difficulty),
            excluded_ids: request.excluded_ids.clone(),
            blocked_channel_ids: request.blocked_channel_ids.clone(),
        };

        Ok(WizardOutcome {
            pack: self.topic_playlist(candidates, &playlist)?,
            final_difficulty,
            difficulty_adjusted: final_difficulty != base,
        })
    }

    /// Strict filter, relaxing the difficulty constraint when it empties
    /// the pool. The relaxation is this caller-level policy, not part of
    /// the filter itself.
    fn filtered_pool(
        &self,
        candidates: &[Candidate],
        pack_request: &mut PackRequest,
    ) -> Vec<Candidate> {
        let strict = filter(candidates, pack_request);
        if !strict.is_empty() || pack_request.target_difficulty.is_none() {
            return strict;
        }

        debug!(
            topic = %pack_request.topic,
            "no candidates at requested difficulty, relaxing to any"
        );
        pack_request.target_difficulty = None;
        filter(candidates, pack_request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, channel: &str, duration: i64, topic: &str) -> Candidate {
        Candidate::new(id, channel, duration, topic)
    }

    fn rust_pool() -> Vec<Candidate> {
        vec![
            candidate("v1", "ch1", 300, "rust").with_difficulty(Difficulty::Beginner),
            candidate("v2", "ch2", 400, "rust").with_difficulty(Difficulty::Intermediate),
            candidate("v3", "ch3", 500, "rust").with_difficulty(Difficulty::Advanced),
            candidate("v4", "ch1", 200, "go").with_difficulty(Difficulty::Beginner),
        ]
    }

    #[test]
    fn test_topic_playlist_respects_window_and_topic() {
        let engine = Engine::default();
        let result = engine
            .topic_playlist(&rust_pool(), &PlaylistRequest::new("rust", 900))
            .unwrap();

        // Window is 900 ± 7% = [837, 963].
        assert!(result.total_duration_sec <= 963);
        assert!(!result.under_filled);
        assert!(result.items.iter().all(|i| i.id != "v4"));
    }

    #[test]
    fn test_topic_playlist_rejects_out_of_range_duration() {
        let engine = Engine::default();
        assert!(
            engine
                .topic_playlist(&rust_pool(), &PlaylistRequest::new("rust", 120))
                .is_err()
        );
        assert!(
            engine
                .topic_playlist(&rust_pool(), &PlaylistRequest::new("rust", 4000))
                .is_err()
        );
    }

    #[test]
    fn test_topic_playlist_empty_pool_is_not_an_error() {
        let engine = Engine::default();
        let result = engine
            .topic_playlist(&[], &PlaylistRequest::new("rust", 600))
            .unwrap();
        assert!(result.is_empty());
        assert!(result.under_filled);
    }

    #[test]
    fn test_topic_playlist_relaxes_difficulty_when_empty() {
        let engine = Engine::default();
        let mut request = PlaylistRequest::new("rust", 600);
        request.target_difficulty = Some(Difficulty::Advanced);

        // Only v3 (500s, advanced) matches strictly; window [558, 642]
        // cannot be reached with it alone plus nothing else at that level,
        // yet the strict pool is non-empty so no relaxation happens.
        let strict = engine.topic_playlist(&rust_pool(), &request).unwrap();
        assert_eq!(strict.items.len(), 1);
        assert!(strict.under_filled);

        // With no advanced candidates at all, the filter relaxes to any
        // difficulty instead of returning nothing.
        let pool = vec![
            candidate("v1", "ch1", 300, "rust").with_difficulty(Difficulty::Beginner),
            candidate("v2", "ch2", 300, "rust").with_difficulty(Difficulty::Beginner),
        ];
        let relaxed = engine.topic_playlist(&pool, &request).unwrap();
        assert_eq!(relaxed.items.len(), 2);
        assert!(!relaxed.under_filled);
    }

    #[test]
    fn test_recommend_rejects_non_positive_remaining() {
        let engine = Engine::default();
        let request = RecommendRequest {
            remaining_seconds: 0,
            exclude_ids: HashSet::new(),
            topic: None,
        };
        assert!(engine.recommend(&rust_pool(), &request).is_err());
    }

    #[test]
    fn test_recommend_applies_exclusions_and_topic() {
        let engine = Engine::default();
        let request = RecommendRequest {
            remaining_seconds: 1200,
            exclude_ids: ["v1".to_string()].into(),
            topic: Some("rust".to_string()),
        };
        let selection = engine.recommend(&rust_pool(), &request).unwrap();

        assert!(!selection.items.is_empty());
        assert!(selection.items.iter().all(|c| c.id != "v1"));
        assert!(selection.items.iter().all(|c| c.topic == "rust"));
        assert!(selection.total_sec <= 1200 + 36);
    }

    #[test]
    fn test_wizard_adjusts_difficulty_before_filtering() {
        let engine = Engine::default();
        let pool = vec![
            candidate("b1", "ch1", 600, "rust").with_difficulty(Difficulty::Beginner),
            candidate("i1", "ch2", 600, "rust").with_difficulty(Difficulty::Intermediate),
        ];
        let request = WizardRequest {
            topic: "rust".to_string(),
            commute_duration_sec: 600,
            difficulty: Some(Difficulty::Beginner),
            excluded_ids: HashSet::new(),
            blocked_channel_ids: HashSet::new(),
        };

        // Mastery 5 crosses the first threshold: beginner -> intermediate.
        let outcome = engine.wizard_playlist(&pool, &request, 5).unwrap();
        assert_eq!(outcome.final_difficulty, Difficulty::Intermediate);
        assert!(outcome.difficulty_adjusted);
        assert_eq!(outcome.pack.items.len(), 1);
        assert_eq!(outcome.pack.items[0].id, "i1");

        // Mastery 0 leaves the requested level untouched.
        let outcome = engine.wizard_playlist(&pool, &request, 0).unwrap();
        assert_eq!(outcome.final_difficulty, Difficulty::Beginner);
        assert!(!outcome.difficulty_adjusted);
        assert_eq!(outcome.pack.items[0].id, "b1");
    }

    #[test]
    fn test_end_to_end_determinism() {
        let engine = Engine::default();
        let request = PlaylistRequest::new("rust", 900);
        let first = engine.topic_playlist(&rust_pool(), &request).unwrap();
        for _ in 0..5 {
            let again = engine.topic_playlist(&rust_pool(), &request).unwrap();
            assert_eq!(first.fingerprint(), again.fingerprint());
        }
    }
}
