//! Seeded topic suggestion
//!
//! Variety without irreproducibility: the shuffle is keyed by an explicit
//! seed string, so the same seed always surfaces the same topics.

use ridepack_engine::SeededRng;

use crate::CandidateSource;
use crate::error::Result;

/// Suggest up to `limit` topics from the source, shuffled by `seed`.
pub async fn suggest_topics(
    source: &dyn CandidateSource,
    seed: &str,
    limit: usize,
) -> Result<Vec<String>> {
    let mut topics = source.topics().await?;
    SeededRng::new(seed).shuffle(&mut topics);
    topics.truncate(limit);
    Ok(topics)
}
