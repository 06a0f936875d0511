//! Difficulty adjustment from watch-history mastery

use serde::{Deserialize, Serialize};

use ridepack_core::Difficulty;

/// Mastery-score thresholds at which difficulty bumps one level.
///
/// Tunable policy, overridable via configuration; never hard-coded at call
/// sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryThresholds {
    pub first_bump_at: u32,
    pub second_bump_at: u32,
}

impl Default for MasteryThresholds {
    fn default() -> Self {
        Self {
            first_bump_at: 3,
            second_bump_at: 8,
        }
    }
}

/// Map a requested difficulty plus a mastery score to the final difficulty.
///
/// Monotonic step function: higher mastery only ever bumps upward, capped
/// at `Advanced`.
pub fn adjust(base: Difficulty, mastery_score: u32, thresholds: &MasteryThresholds) -> Difficulty {
    let mut level = base;
    if mastery_score >= thresholds.first_bump_at {
        level = level.bump();
    }
    if mastery_score >= thresholds.second_bump_at {
        level = level.bump();
    }
    level
}
