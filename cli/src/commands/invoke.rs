//! Invoke a single tool from the resolved toolset

use crate::config::CliConfigLoader;
use crate::output::ToolOutputFormatter;
use anyhow::{bail, Context, Result};
use dialtone_core::{AgentBuilder, ToolCall};
use serde_json::Value;

pub async fn invoke_command(
    tool_name: &str,
    raw_arguments: Option<&str>,
    config_loader: CliConfigLoader,
) -> Result<()> {
    let arguments: Value = match raw_arguments {
        Some(raw) => serde_json::from_str(raw)
            .with_context(|| format!("Arguments for '{}' are not valid JSON", tool_name))?,
        None => Value::Object(Default::default()),
    };

    let config = config_loader.load().await?;
    let setup = AgentBuilder::new(config.store())
        .with_settings(config.settings)
        .prepare()
        .await?;

    let rendered = arguments.to_string();
    let result = setup
        .toolset
        .execute(ToolCall::new(tool_name, arguments))
        .await?;

    println!(
        "{}",
        ToolOutputFormatter::new()
            .full()
            .format_tool_result(tool_name, &rendered, &result)
    );

    if !result.success {
        bail!("tool '{}' failed", tool_name);
    }
    Ok(())
}
