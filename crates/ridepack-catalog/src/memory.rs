//! In-memory collaborators for tests and embedding

use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;

use ridepack_core::Candidate;

use crate::error::Result;
use crate::{CandidateSource, WatchHistory};

/// Candidate source over an in-memory list.
#[derive(Default)]
pub struct MemoryCatalog {
    videos: Vec<Candidate>,
}

impl MemoryCatalog {
    pub fn new(videos: Vec<Candidate>) -> Self {
        Self { videos }
    }

    pub fn push(&mut self, candidate: Candidate) {
        self.videos.push(candidate);
    }
}

#[async_trait]
impl CandidateSource for MemoryCatalog {
    async fn candidates_for_topic(&self, topic: &str) -> Result<Vec<Candidate>> {
        Ok(self
            .videos
            .iter()
            .filter(|c| c.matches_topic(topic))
            .cloned()
            .collect())
    }

    async fn topics(&self) -> Result<Vec<String>> {
        let topics: BTreeSet<String> = self
            .videos
            .iter()
            .map(|c| c.topic.to_ascii_lowercase())
            .collect();
        Ok(topics.into_iter().collect())
    }
}

/// Watch history over an in-memory map.
#[derive(Default)]
pub struct MemoryHistory {
    watched: HashMap<String, HashSet<String>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one watched item for a topic.
    pub fn record(&mut self, topic: &str, id: impl Into<String>) {
        self.watched
            .entry(topic.to_ascii_lowercase())
            .or_default()
            .insert(id.into());
    }
}

#[async_trait]
impl WatchHistory for MemoryHistory {
    async fn watched_ids(&self, topic: &str) -> Result<HashSet<String>> {
        Ok(self
            .watched
            .get(&topic.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default())
    }

    async fn mastery_score(&self, topic: &str) -> Result<u32> {
        Ok(self
            .watched
            .get(&topic.to_ascii_lowercase())
            .map(|ids| ids.len() as u32)
            .unwrap_or(0))
    }
}
