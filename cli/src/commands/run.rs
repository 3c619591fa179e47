//! Conversation session command

use crate::config::CliConfigLoader;
use crate::runtime::ConsoleRuntime;
use anyhow::Result;
use dialtone_core::AgentBuilder;
use tracing::info;

/// Bootstrap the agent and hold a console conversation
pub async fn run_command(config_loader: CliConfigLoader) -> Result<()> {
    let config = config_loader.load().await?;
    info!("Tool timeout: {}s", config.settings.tool_timeout_secs);

    let mut runtime = ConsoleRuntime::stdio();
    AgentBuilder::new(config.store())
        .with_settings(config.settings)
        .start(&mut runtime)
        .await?;

    info!("Session ended");
    Ok(())
}
