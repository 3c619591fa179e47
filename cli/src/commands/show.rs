//! Show the effective configuration

use crate::config::CliConfigLoader;
use anyhow::Result;
use dialtone_core::ConfigStore;

pub async fn show_command(config_loader: CliConfigLoader) -> Result<()> {
    let config = config_loader.load().await?;
    let store = ConfigStore::new(config.store());
    let outcome = store.load_outcome().await;
    let configuration = &outcome.configuration;

    println!("📁 Store: {}", store.describe());
    println!("📄 Source: {}", outcome.source);
    if let Some(updated_at) = configuration.updated_at {
        println!("🕒 Updated: {}", updated_at.to_rfc3339());
    }

    println!("\n🎭 Instruction:\n{}", configuration.effective_instruction());
    println!("\n👋 Begin message:\n{}", configuration.effective_begin_message());

    println!("\n🛠️  Tools:");
    if configuration.tools.is_empty() {
        println!("   (none)");
    }
    for tool in &configuration.tools {
        println!(
            "   {} {} {} {}{}",
            if tool.enabled { "✓" } else { "-" },
            tool.name,
            tool.request_type,
            tool.request_url,
            if tool.enabled { "" } else { " (disabled)" }
        );
    }

    for rejection in &outcome.rejected {
        println!(
            "   ✗ {} ({}): {}",
            rejection.tool_name.as_deref().unwrap_or("unnamed"),
            rejection.tool_id,
            rejection.reasons.join("; ")
        );
    }

    Ok(())
}
