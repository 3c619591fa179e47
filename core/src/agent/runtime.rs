//! Conversation runtime seam

use crate::config::AgentConfiguration;
use crate::error::Result;
use crate::store::ConfigSource;
use crate::tools::Toolset;
use async_trait::async_trait;

/// Everything a conversation runtime needs to start
#[derive(Debug, Clone)]
pub struct AgentSetup {
    /// The configuration the toolset was built from
    pub configuration: AgentConfiguration,

    /// Personality plus tool reference and usage guidelines
    pub instructions: String,

    /// Greeting spoken first
    pub begin_message: String,

    /// Opening task prompt embedding the greeting
    pub session_instruction: String,

    /// Resolved toolset, immutable for the life of the process
    pub toolset: Toolset,

    pub source: ConfigSource,
}

/// Hosts the dialogue and invokes tools from the setup's toolset
#[async_trait]
pub trait ConversationRuntime: Send {
    async fn run(&mut self, setup: AgentSetup) -> Result<()>;
}
