//! Validate a configuration document without storing it

use super::read_document;
use anyhow::{bail, Result};
use dialtone_core::config::validate_report;
use std::path::Path;

/// Print kept and rejected tools; fails when the document is structurally invalid
pub async fn validate_command(path: &Path) -> Result<()> {
    let document = read_document(path).await?;

    let report = match validate_report(&document) {
        Ok(report) => report,
        Err(errors) => {
            println!("❌ {} is structurally invalid:", path.display());
            for error in &errors {
                println!("   {}", error);
            }
            bail!(
                "configuration document is structurally invalid ({} errors)",
                errors.len()
            );
        }
    };

    let configuration = &report.configuration;
    println!("✅ {} is a loadable configuration", path.display());
    println!(
        "   {} tools kept, {} rejected",
        configuration.tools.len(),
        report.rejected.len()
    );

    for tool in &configuration.tools {
        println!(
            "   ✓ {} ({} {}){}",
            tool.name,
            tool.request_type,
            tool.request_url,
            if tool.enabled { "" } else { " [disabled]" }
        );
    }
    for rejection in &report.rejected {
        println!(
            "   ✗ {} ({}): {}",
            rejection.tool_name.as_deref().unwrap_or("unnamed"),
            rejection.tool_id,
            rejection.reasons.join("; ")
        );
    }

    Ok(())
}
