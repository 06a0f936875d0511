use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use ridepack_catalog::{CandidateSource, FileCatalog, FileHistory, WatchHistory};
use ridepack_core::{Candidate, Difficulty, PackResult};
use ridepack_engine::{Engine, EngineOptions, PlaylistRequest};

use super::format_duration;

/// Transport shape for a packed playlist: selected items joined back to
/// their catalog display metadata.
#[derive(Debug, Serialize)]
pub(crate) struct PlaylistView {
    items: Vec<PlaylistItemView>,
    total_duration_sec: i64,
    under_filled: bool,
}

#[derive(Debug, Serialize)]
struct PlaylistItemView {
    video_id: String,
    duration_sec: i64,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel_title: Option<String>,
    level: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnail: Option<String>,
}

impl PlaylistView {
    pub(crate) fn new(result: &PackResult, candidates: &[Candidate]) -> Self {
        let by_id: HashMap<&str, &Candidate> =
            candidates.iter().map(|c| (c.id.as_str(), c)).collect();

        let items = result
            .items
            .iter()
            .map(|item| {
                let meta = by_id.get(item.id.as_str()).copied();
                PlaylistItemView {
                    video_id: item.id.clone(),
                    duration_sec: item.duration_sec,
                    title: meta.map(|c| c.title.clone()).unwrap_or_default(),
                    channel_title: meta.and_then(|c| c.channel_title.clone()),
                    level: meta.map(|c| c.difficulty).unwrap_or_default(),
                    thumbnail: meta.and_then(|c| c.thumbnail.clone()),
                }
            })
            .collect();

        Self {
            items,
            total_duration_sec: result.total_duration_sec,
            under_filled: result.under_filled,
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn handle(
    topic: String,
    duration: i64,
    catalog_path: PathBuf,
    history_path: Option<PathBuf>,
    difficulty: Option<Difficulty>,
    block_channel: Vec<String>,
    json: bool,
    options: EngineOptions,
) -> Result<()> {
    let catalog = FileCatalog::load(&catalog_path).await?;
    let candidates = catalog.candidates_for_topic(&topic).await?;

    let excluded_ids = match &history_path {
        Some(path) => FileHistory::load(path).await?.watched_ids(&topic).await?,
        None => HashSet::new(),
    };

    let request = PlaylistRequest {
        topic: topic.clone(),
        duration_sec: duration,
        target_difficulty: difficulty,
        excluded_ids,
        blocked_channel_ids: block_channel.into_iter().collect(),
    };

    let engine = Engine::new(options);
    let result = engine.topic_playlist(&candidates, &request)?;

    if json {
        let view = PlaylistView::new(&result, &candidates);
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    print_pack(&topic, duration, &result, &candidates);
    Ok(())
}

pub(crate) fn print_pack(
    topic: &str,
    requested_sec: i64,
    result: &PackResult,
    candidates: &[Candidate],
) {
    if result.is_empty() {
        println!("No pack fits \"{}\" - try another topic.", topic);
        return;
    }

    println!(
        "✓ Packed {} video(s) for \"{}\" ({} of {})",
        result.items.len(),
        topic,
        format_duration(result.total_duration_sec),
        format_duration(requested_sec),
    );

    let by_id: HashMap<&str, &Candidate> =
        candidates.iter().map(|c| (c.id.as_str(), c)).collect();

    for item in &result.items {
        let title = by_id
            .get(item.id.as_str())
            .map(|c| c.title.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or("(untitled)");
        println!(
            "  {}  {}  {}",
            item.id,
            format_duration(item.duration_sec),
            title
        );
    }

    if result.under_filled {
        println!("  (under-filled: could not reach the requested minimum)");
    }
}
