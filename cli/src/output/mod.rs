//! Output formatting for the CLI

pub mod formatter;

pub use formatter::{ToolOutputFormatter, ToolStatus};
