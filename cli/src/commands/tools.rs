//! Tools listing command

use crate::config::CliConfigLoader;
use crate::output::ToolOutputFormatter;
use anyhow::Result;
use dialtone_core::AgentBuilder;
use tracing::info;

/// Show the resolved toolset
pub async fn tools_command(config_loader: CliConfigLoader) -> Result<()> {
    info!("Listing available tools");

    let config = config_loader.load().await?;
    let setup = AgentBuilder::new(config.store())
        .with_settings(config.settings)
        .prepare()
        .await?;

    let formatter = ToolOutputFormatter::new();
    println!("🛠️  Available Tools ({})\n", setup.toolset.len());
    for tool in setup.toolset.iter() {
        println!("{}\n", formatter.format_tool_signature(tool.as_ref()));
    }

    if setup.source.is_default() {
        println!("💡 No stored configuration was loaded ({}).", setup.source);
        println!("   Use `dialtone save <FILE>` to store one.");
    }

    Ok(())
}
