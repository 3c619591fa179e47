//! Tool registry for built-in tools and toolset resolution

use crate::config::{is_reserved_tool_name, AgentConfiguration, ResolvedSettings};
use crate::error::Result;
use crate::tools::builtin::SearchWebToolFactory;
use crate::tools::dynamic::DynamicToolFactory;
use crate::tools::http::HttpTransport;
use crate::tools::{Tool, Toolset};
use std::sync::Arc;
use tracing::warn;

/// Factory trait for creating tools
pub trait ToolFactory: Send + Sync {
    /// Create a new instance of the tool
    fn create(&self) -> Arc<dyn Tool>;

    /// Get the name of the tool this factory creates
    fn tool_name(&self) -> &str;

    /// Get the description of the tool this factory creates
    fn tool_description(&self) -> &str;
}

/// Registry of built-in tool factories, kept in registration order
pub struct ToolRegistry {
    factories: Vec<Box<dyn ToolFactory>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Create a registry holding every built-in tool
    pub fn with_builtins(transport: Arc<dyn HttpTransport>, settings: &ResolvedSettings) -> Self {
        let mut registry = Self::new();
        registry.register_factory(Box::new(SearchWebToolFactory::new(transport, settings)));
        registry
    }

    /// Register a tool factory, replacing one with the same name
    pub fn register_factory(&mut self, factory: Box<dyn ToolFactory>) {
        self.factories
            .retain(|existing| existing.tool_name() != factory.tool_name());
        self.factories.push(factory);
    }

    /// List all registered tool names
    pub fn list_tools(&self) -> Vec<&str> {
        self.factories.iter().map(|f| f.tool_name()).collect()
    }

    /// Get tool information
    pub fn get_tool_info(&self, name: &str) -> Option<(&str, &str)> {
        self.factories
            .iter()
            .find(|f| f.tool_name() == name)
            .map(|f| (f.tool_name(), f.tool_description()))
    }

    /// Names that configured tools may not use
    pub fn reserved_names(&self) -> Vec<&str> {
        self.list_tools()
    }

    fn is_reserved(&self, name: &str) -> bool {
        is_reserved_tool_name(name) || self.factories.iter().any(|f| f.tool_name() == name)
    }

    /// Instantiate every built-in tool
    pub fn builtins(&self) -> Vec<Arc<dyn Tool>> {
        self.factories.iter().map(|f| f.create()).collect()
    }

    /// Build the toolset for a configuration
    ///
    /// Enabled configured tools come first in configuration order, followed
    /// by the built-ins. A configured tool that claims a reserved name is
    /// skipped with a warning.
    pub fn resolve(
        &self,
        configuration: &AgentConfiguration,
        factory: &DynamicToolFactory,
    ) -> Result<Toolset> {
        let mut tools: Vec<Arc<dyn Tool>> = Vec::new();

        for spec in configuration.enabled_tools() {
            if self.is_reserved(&spec.name) {
                warn!(
                    "Skipping configured tool '{}' ({}): name is reserved for a built-in tool",
                    spec.name, spec.id
                );
                continue;
            }
            if tools.iter().any(|tool| tool.name() == spec.name) {
                warn!(
                    "Skipping configured tool '{}' ({}): an earlier tool already uses this name",
                    spec.name, spec.id
                );
                continue;
            }
            tools.push(Arc::new(factory.build(spec)));
        }

        tools.extend(self.builtins());
        Toolset::assemble(tools)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
