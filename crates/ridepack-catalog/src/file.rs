//! JSON-file-backed catalog and history
//!
//! The file formats mirror what the upstream metadata service returns, so
//! a saved API response works as a catalog file directly. Entries that fail
//! to parse are skipped with a warning; one bad record must not block an
//! otherwise-fittable pack.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use ridepack_core::Candidate;

use crate::error::{CatalogError, Result};
use crate::{CandidateSource, WatchHistory};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    videos: Vec<serde_json::Value>,
}

/// Candidate source backed by a JSON catalog file, loaded eagerly.
#[derive(Debug)]
pub struct FileCatalog {
    videos: Vec<Candidate>,
}

impl FileCatalog {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let file: CatalogFile =
            serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        let mut videos = Vec::with_capacity(file.videos.len());
        for raw in file.videos {
            match serde_json::from_value::<Candidate>(raw) {
                Ok(candidate) => videos.push(candidate),
                Err(e) => warn!(error = %e, "skipping malformed catalog entry"),
            }
        }

        debug!(path = %path.display(), count = videos.len(), "loaded catalog");
        Ok(Self { videos })
    }

    pub fn all(&self) -> &[Candidate] {
        &self.videos
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}

#[async_trait]
impl CandidateSource for FileCatalog {
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

#[derive(Debug, Deserialize)]
struct HistoryFile {
    /// Topic -> ids of watched items.
    #[serde(default)]
    watched: HashMap<String, Vec<String>>,
}

/// Watch history backed by a JSON file.
pub struct FileHistory {
    watched: HashMap<String, Vec<String>>,
}

impl FileHistory {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let file: HistoryFile =
            serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        // Topic keys are matched case-insensitively.
        let watched = file
            .watched
            .into_iter()
            .map(|(topic, ids)| (topic.to_ascii_lowercase(), ids))
            .collect();

        Ok(Self { watched })
    }
}

#[async_trait]
impl WatchHistory for FileHistory {
    async fn watched_ids(&self, topic: &str) -> Result<HashSet<String>> {
        Ok(self
            .watched
            .get(&topic.to_ascii_lowercase())
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn mastery_score(&self, topic: &str) -> Result<u32> {
        let distinct: HashSet<&String> = self
            .watched
            .get(&topic.to_ascii_lowercase())
            .map(|ids| ids.iter().collect())
            .unwrap_or_default();
        Ok(distinct.len() as u32)
    }
}
