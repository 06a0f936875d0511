//! Packing request parameters

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::candidate::Difficulty;
use crate::error::{Error, Result};

/// Inclusive duration window in seconds.
///
/// Constructed only through [`DurationWindow::new`] or
/// [`DurationWindow::around`], both of which reject `min > max` before any
/// packing logic can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationWindow {
    pub min_sec: i64,
    pub max_sec: i64,
}

impl DurationWindow {
    pub fn new(min_sec: i64, max_sec: i64) -> Result<Self> {
        if min_sec > max_sec {
            return Err(Error::InvalidWindow {
                min: min_sec,
                max: max_sec,
            });
        }
        Ok(Self { min_sec, max_sec })
    }

    /// Build the `target ± tolerance_pct` band.
    pub fn around(target_sec: i64, tolerance_pct: u8) -> Result<Self> {
        if target_sec <= 0 {
            return Err(Error::InvalidRequest(format!(
                "target duration must be positive, got {}",
                target_sec
            )));
        }
        let slack = target_sec * i64::from(tolerance_pct) / 100;
        Self::new(target_sec - slack, target_sec + slack)
    }

    pub fn contains(&self, duration_sec: i64) -> bool {
        duration_sec >= self.min_sec && duration_sec <= self.max_sec
    }
}

/// Packing parameters for one engine invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackRequest {
    pub topic: String,
    pub window: DurationWindow,
    #[serde(default)]
    pub target_difficulty: Option<Difficulty>,
    /// Already-watched or explicitly skipped items.
    #[serde(default)]
    pub excluded_ids: HashSet<String>,
    /// Creator-level exclusion.
    #[serde(default)]
    pub blocked_channel_ids: HashSet<String>,
    /// Fixes any seeded shuffling downstream of this request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
}

impl PackRequest {
    pub fn new(topic: impl Into<String>, window: DurationWindow) -> Self {
        Self {
            topic: topic.into(),
            window,
            target_difficulty: None,
            excluded_ids: HashSet::new(),
            blocked_channel_ids: HashSet::new(),
            seed: None,
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.target_difficulty = Some(difficulty);
        self
    }

    pub fn with_excluded_ids(mut self, ids: HashSet<String>) -> Self {
        self.excluded_ids = ids;
        self
    }

    pub fn with_blocked_channels(mut self, channel_ids: HashSet<String>) -> Self {
        self.blocked_channel_ids = channel_ids;
        self
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }
}
