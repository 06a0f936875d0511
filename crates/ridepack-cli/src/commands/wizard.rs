use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use ridepack_catalog::{CandidateSource, FileCatalog, FileHistory, WatchHistory};
use ridepack_core::Difficulty;
use ridepack_engine::{Engine, EngineOptions, WizardRequest};

use super::playlist::{PlaylistView, print_pack};

/// Wizard transport shape: the playlist plus how difficulty was resolved.
#[derive(Debug, Serialize)]
struct WizardView {
    #[serde(flatten)]
    playlist: PlaylistView,
    final_difficulty: Difficulty,
    difficulty_adjusted: bool,
}

pub async fn handle(
    topic: String,
    commute: i64,
    difficulty: Option<Difficulty>,
    catalog_path: PathBuf,
    history_path: Option<PathBuf>,
    json: bool,
    options: EngineOptions,
) -> Result<()> {
    let catalog = FileCatalog::load(&catalog_path).await?;
    let candidates = catalog.candidates_for_topic(&topic).await?;

    let (excluded_ids, mastery_score) = match &history_path {
        Some(path) => {
            let history = FileHistory::load(path).await?;
            (
                history.watched_ids(&topic).await?,
                history.mastery_score(&topic).await?,
            )
        }
        None => (HashSet::new(), 0),
    };

    let request = WizardRequest {
        topic: topic.clone(),
        commute_duration_sec: commute,
        difficulty,
        excluded_ids,
        blocked_channel_ids: HashSet::new(),
    };

    let engine = Engine::new(options);
    let outcome = engine.wizard_playlist(&candidates, &request, mastery_score)?;

    if json {
        let view = WizardView {
            playlist: PlaylistView::new(&outcome.pack, &candidates),
            final_difficulty: outcome.final_difficulty,
            difficulty_adjusted: outcome.difficulty_adjusted,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if outcome.difficulty_adjusted {
        println!(
            "✓ Difficulty bumped to {} ({} item(s) already watched on this topic)",
            outcome.final_difficulty, mastery_score
        );
    } else {
        println!("✓ Difficulty: {}", outcome.final_difficulty);
    }
    print_pack(&topic, commute, &outcome.pack, &candidates);

    Ok(())
}
