mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use ridepack_config::Config;
use ridepack_engine::{EngineOptions, MasteryThresholds};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();
    let config = Config::load()?;
    let options = engine_options(&config);

    match cli.command {
        cli::Commands::Playlist {
            topic,
            duration,
            catalog,
            history,
            difficulty,
            block_channel,
            json,
        } => {
            commands::playlist::handle(
                topic,
                duration,
                catalog,
                history,
                difficulty,
                block_channel,
                json,
                options,
            )
            .await
        }
        cli::Commands::Recommend {
            remaining,
            topic,
            exclude,
            catalog,
            json,
        } => commands::recommend::handle(remaining, topic, exclude, catalog, json, options).await,
        cli::Commands::Wizard {
            topic,
            commute,
            difficulty,
            catalog,
            history,
            json,
        } => commands::wizard::handle(topic, commute, difficulty, catalog, history, json, options)
            .await,
        cli::Commands::Topics {
            catalog,
            seed,
            limit,
        } => commands::topics::handle(catalog, seed, limit).await,
        cli::Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut cli::Cli::command(),
                "ridepack",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

fn engine_options(config: &Config) -> EngineOptions {
    EngineOptions {
        tolerance_pct: config.tolerance_pct,
        overbook_pct: config.overbook_pct,
        mastery: MasteryThresholds {
            first_bump_at: config.mastery.first_bump_at,
            second_bump_at: config.mastery.second_bump_at,
        },
        min_request_sec: config.limits.min_request_sec,
        max_request_sec: config.limits.max_request_sec,
    }
}
