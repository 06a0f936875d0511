//! Candidate catalog and watch-history collaborators
//!
//! The engine treats both services as injected, read-only snapshots: the
//! traits here are the only seam, and their responses are immutable for the
//! duration of one call. Feeds are untrusted - sparse or malformed entries
//! are tolerated, logged, and skipped, never fatal.

pub mod error;
pub mod file;
pub mod memory;
pub mod suggest;

pub use error::{CatalogError, Result};
pub use file::{FileCatalog, FileHistory};
pub use memory::{MemoryCatalog, MemoryHistory};
pub use suggest::suggest_topics;

use std::collections::HashSet;

use async_trait::async_trait;

use ridepack_core::Candidate;

/// Supplies candidate metadata for a topic query.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn candidates_for_topic(&self, topic: &str) -> Result<Vec<Candidate>>;

    /// Distinct topics available in this source, sorted for determinism.
    async fn topics(&self) -> Result<Vec<String>>;
}

/// Supplies a user's consumption history for a topic.
#[async_trait]
pub trait WatchHistory: Send + Sync {
    /// Ids of previously consumed items for the topic.
    async fn watched_ids(&self, topic: &str) -> Result<HashSet<String>>;

    /// Count-based familiarity proxy: number of prior watched items.
    async fn mastery_score(&self, topic: &str) -> Result<u32>;
}
