//! # Dialtone Core
//!
//! Core library for dialtone - configuration-driven tool binding for
//! conversational agents.
//!
//! A single stored configuration document describes the agent's personality
//! and a set of REST endpoints. At startup the document is loaded, validated
//! and turned into a toolset of typed, invocable tools alongside the built-in
//! web search.

// Core modules
pub mod agent;
pub mod config;
pub mod error;
pub mod store;
pub mod tools;

// Re-export commonly used types
pub use agent::{AgentBuilder, AgentSetup, ConversationRuntime};
pub use config::{AgentConfiguration, ParameterSpec, ResolvedSettings, ToolSpec};
pub use error::{Error, Result};
pub use store::{ConfigSource, ConfigStore, DocumentStore};
pub use tools::{Tool, ToolCall, ToolResult, Toolset};

/// Current version of the dialtone-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing with a specific debug mode; RUST_LOG wins when set
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing_with_debug(debug: bool) {
    let filter = if debug { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
