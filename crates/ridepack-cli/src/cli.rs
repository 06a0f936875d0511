use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use ridepack_core::Difficulty;

#[derive(Parser)]
#[command(name = "ridepack")]
#[command(about = "Commute-sized learning packs from a video catalog", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a playlist for a topic that fits a duration window
    Playlist {
        /// Topic to search the catalog for
        topic: String,

        /// Target duration in seconds (window is target ± tolerance)
        #[arg(long)]
        duration: i64,

        /// Catalog JSON file
        #[arg(long, default_value = "catalog.json")]
        catalog: PathBuf,

        /// Watch-history JSON file; watched items are excluded
        #[arg(long)]
        history: Option<PathBuf>,

        /// Restrict to one difficulty level
        #[arg(long, value_parser = parse_difficulty)]
        difficulty: Option<Difficulty>,

        /// Channel ids to block
        #[arg(long)]
        block_channel: Vec<String>,

        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recommend a pack for the remaining ride time
    Recommend {
        /// Remaining seconds in the ride
        remaining: i64,

        /// Optional topic narrowing
        #[arg(long)]
        topic: Option<String>,

        /// Item ids to exclude
        #[arg(long)]
        exclude: Vec<String>,

        /// Catalog JSON file
        #[arg(long, default_value = "catalog.json")]
        catalog: PathBuf,

        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Difficulty-aware playlist from a topic and commute length
    Wizard {
        /// Topic to search the catalog for
        topic: String,

        /// Commute duration in seconds
        #[arg(long)]
        commute: i64,

        /// Requested difficulty (mastery may bump it upward)
        #[arg(long, value_parser = parse_difficulty)]
        difficulty: Option<Difficulty>,

        /// Catalog JSON file
        #[arg(long, default_value = "catalog.json")]
        catalog: PathBuf,

        /// Watch-history JSON file; drives exclusion and mastery
        #[arg(long)]
        history: Option<PathBuf>,

        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest topics available in the catalog
    Topics {
        /// Catalog JSON file
        #[arg(long, default_value = "catalog.json")]
        catalog: PathBuf,

        /// Shuffle seed; the same seed gives the same order
        #[arg(long, default_value = "ridepack")]
        seed: String,

        /// Maximum topics to show
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    match s.to_ascii_lowercase().as_str() {
        "beginner" => Ok(Difficulty::Beginner),
        "intermediate" => Ok(Difficulty::Intermediate),
        "advanced" => Ok(Difficulty::Advanced),
        other => Err(format!(
            "unknown difficulty: {other} (expected beginner, intermediate or advanced)"
        )),
    }
}
