//! Save a configuration document to the store

use super::read_document;
use crate::config::CliConfigLoader;
use anyhow::{Context, Result};
use dialtone_core::ConfigStore;
use std::path::Path;
use tracing::info;

pub async fn save_command(path: &Path, config_loader: CliConfigLoader) -> Result<()> {
    let document = read_document(path).await?;
    let config = config_loader.load().await?;
    let store = ConfigStore::new(config.store());

    let report = store
        .save_raw(document)
        .await
        .with_context(|| format!("Failed to save {} to {}", path.display(), store.describe()))?;
    info!("Configuration saved to {}", store.describe());

    println!("💾 Saved configuration to {}", store.describe());
    println!("   {} tools will load", report.configuration.tools.len());
    for rejection in &report.rejected {
        println!(
            "   ⚠️  {} ({}) will be skipped: {}",
            rejection.tool_name.as_deref().unwrap_or("unnamed"),
            rejection.tool_id,
            rejection.reasons.join("; ")
        );
    }
    Ok(())
}
