//! CLI command implementations

pub mod invoke;
pub mod run;
pub mod save;
pub mod show;
pub mod tools;
pub mod validate;

pub use invoke::invoke_command;
pub use run::run_command;
pub use save::save_command;
pub use show::show_command;
pub use tools::tools_command;
pub use validate::validate_command;

use anyhow::{Context, Result};
use std::path::Path;

/// Read a configuration document from a JSON file
pub(crate) async fn read_document(path: &Path) -> Result<serde_json::Value> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read document: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse document as JSON: {}", path.display()))
}
