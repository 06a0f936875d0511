use std::path::PathBuf;

use anyhow::Result;

use ridepack_catalog::{CandidateSource, FileCatalog};
use ridepack_engine::{Engine, EngineOptions, RecommendRequest};

use super::format_duration;

pub async fn handle(
    remaining: i64,
    topic: Option<String>,
    exclude: Vec<String>,
    catalog_path: PathBuf,
    json: bool,
    options: EngineOptions,
) -> Result<()> {
    let catalog = FileCatalog::load(&catalog_path).await?;
    // No topic means the whole catalog is eligible.
    let candidates = match &topic {
        Some(t) => catalog.candidates_for_topic(t).await?,
        None => catalog.all().to_vec(),
    };

    let request = RecommendRequest {
        remaining_seconds: remaining,
        exclude_ids: exclude.into_iter().collect(),
        topic,
    };

    let engine = Engine::new(options);
    let selection = engine.recommend(&candidates, &request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
        return Ok(());
    }

    if selection.items.is_empty() {
        println!(
            "Nothing fits the remaining {} - try widening the search.",
            format_duration(remaining)
        );
        return Ok(());
    }

    println!(
        "✓ {} video(s) for your remaining {} ({} packed, strategy: {})",
        selection.items.len(),
        format_duration(remaining),
        format_duration(selection.total_sec),
        selection.strategy,
    );
    for item in &selection.items {
        let title = if item.title.is_empty() {
            "(untitled)"
        } else {
            item.title.as_str()
        };
        println!(
            "  {}  {}  {}",
            item.id,
            format_duration(item.duration_sec),
            title
        );
    }

    Ok(())
}
