use std::path::PathBuf;

use anyhow::Result;

use ridepack_catalog::{FileCatalog, suggest_topics};

pub async fn handle(catalog_path: PathBuf, seed: String, limit: usize) -> Result<()> {
    let catalog = FileCatalog::load(&catalog_path).await?;
    let topics = suggest_topics(&catalog, &seed, limit).await?;

    if topics.is_empty() {
        println!("No topics found in the catalog.");
        return Ok(());
    }

    println!("Topics:");
    for topic in topics {
        println!("  {}", topic);
    }

    Ok(())
}
