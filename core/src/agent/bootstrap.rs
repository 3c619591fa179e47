//! Agent bootstrap: load configuration, resolve the toolset, start the runtime

use super::prompt::{build_instructions, build_session_instruction};
use super::runtime::{AgentSetup, ConversationRuntime};
use crate::config::ResolvedSettings;
use crate::error::{Error, Result};
use crate::store::{ConfigStore, DocumentStore, LoadOutcome};
use crate::tools::{DynamicToolFactory, HttpTransport, ReqwestTransport, ToolRegistry, Toolset};
use std::sync::Arc;
use tracing::info;

/// Builder for starting an agent from a configuration store
pub struct AgentBuilder {
    store: Arc<dyn DocumentStore>,
    settings: ResolvedSettings,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl AgentBuilder {
    /// Create a new agent builder reading from `store`
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            settings: ResolvedSettings::default(),
            transport: None,
        }
    }

    /// Set runtime settings
    pub fn with_settings(mut self, settings: ResolvedSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Use a specific transport for every tool instead of the default client
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    fn transport(&self) -> Result<Arc<dyn HttpTransport>> {
        match &self.transport {
            Some(transport) => Ok(transport.clone()),
            None => Ok(Arc::new(ReqwestTransport::new(self.settings.tool_timeout())?)),
        }
    }

    /// Load configuration and resolve the toolset without starting a runtime
    pub async fn prepare(&self) -> Result<AgentSetup> {
        self.settings
            .validate()
            .map_err(|e| Error::Generic(format!("Invalid agent settings: {}", e)))?;
        let transport = self.transport()?;
        let LoadOutcome {
            configuration,
            source,
            ..
        } = ConfigStore::new(self.store.clone()).load_outcome().await;

        let registry = ToolRegistry::with_builtins(transport.clone(), &self.settings);
        let toolset = registry.resolve(&configuration, &DynamicToolFactory::new(transport))?;
        log_inventory(&toolset);

        let instructions = build_instructions(configuration.effective_instruction(), &toolset);
        let begin_message = configuration.effective_begin_message().to_string();
        let session_instruction = build_session_instruction(&begin_message);

        Ok(AgentSetup {
            configuration,
            instructions,
            begin_message,
            session_instruction,
            toolset,
            source,
        })
    }

    /// Prepare the agent and hand it to a conversation runtime
    pub async fn start<R: ConversationRuntime + ?Sized>(&self, runtime: &mut R) -> Result<()> {
        let setup = self.prepare().await?;
        info!("Starting conversation runtime (configuration: {})", setup.source);
        runtime.run(setup).await
    }
}

fn log_inventory(toolset: &Toolset) {
    info!("=== Agent tools available ===");
    for (i, tool) in toolset.iter().enumerate() {
        info!("Tool {}: {} - {}", i + 1, tool.name(), tool.description());
    }
    info!("Total tools available: {}", toolset.len());
}
