//! Pack result domain model

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::request::DurationWindow;

/// One selected item in a pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackItem {
    pub id: String,
    pub duration_sec: i64,
    pub channel_id: String,
}

impl From<&Candidate> for PackItem {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id.clone(),
            duration_sec: candidate.duration_sec,
            channel_id: candidate.channel_id.clone(),
        }
    }
}

/// Outcome of one packing invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackResult {
    pub items: Vec<PackItem>,
    pub total_duration_sec: i64,
    /// True iff the total falls short of the requested minimum.
    pub under_filled: bool,
}

impl PackResult {
    /// Build a result from selected items, computing the total and the
    /// under-fill flag against the window.
    pub fn from_items(items: Vec<PackItem>, window: &DurationWindow) -> Self {
        let total_duration_sec = items.iter().map(|i| i.duration_sec).sum();
        Self {
            items,
            total_duration_sec,
            under_filled: total_duration_sec < window.min_sec,
        }
    }

    /// An empty, under-filled result (no candidate survived filtering, or
    /// nothing fits the window).
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_duration_sec: 0,
            under_filled: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stable content digest of the result.
    ///
    /// Identical inputs must yield identical packs; callers compare
    /// fingerprints to assert reproducibility across runs.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for item in &self.items {
            hasher.update(item.id.as_bytes());
            hasher.update(&item.duration_sec.to_le_bytes());
            hasher.update(item.channel_id.as_bytes());
        }
        hasher.update(&self.total_duration_sec.to_le_bytes());
        hasher.update(&[u8::from(self.under_filled)]);
        hasher.finalize().to_hex().to_string()
    }
}
