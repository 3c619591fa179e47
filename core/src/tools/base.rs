//! Base tool traits and structures

use crate::config::ParameterSpec;
use crate::error::{AgentError, Result, ToolError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Trait for all tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the name of the tool
    fn name(&self) -> &str;

    /// Get the description of the tool
    fn description(&self) -> &str;

    /// Get the typed parameter signature
    fn signature(&self) -> &[ParameterSpec];

    /// Get the JSON schema for the tool's parameters
    fn parameters_schema(&self) -> Value {
        parameters_schema(self.signature())
    }

    /// Invoke the tool with named arguments
    ///
    /// Failures are reported through the returned result, never by panicking
    /// or erroring, so a broken tool cannot end a conversation turn.
    async fn invoke(&self, arguments: &Value) -> ToolResult;

    /// Execute a tool call, tagging the result with the call id
    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let result = self.invoke(&call.parameters).await;
        Ok(result.with_call_id(call.id))
    }

    /// Whether the tool is built in rather than configured
    fn is_builtin(&self) -> bool {
        false
    }
}

/// Build a JSON schema object from a parameter signature
pub fn parameters_schema(parameters: &[ParameterSpec]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for parameter in parameters {
        let mut property = Map::new();
        property.insert("type".to_string(), json!(parameter.param_type.as_str()));
        if let Some(description) = &parameter.description {
            property.insert("description".to_string(), json!(description));
        }
        if let Some(default) = &parameter.default_value {
            property.insert("default".to_string(), json!(default));
        }
        properties.insert(parameter.name.clone(), Value::Object(property));

        if parameter.required {
            required.push(json!(parameter.name));
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

/// A call to a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,

    /// Name of the tool to call
    pub name: String,

    /// Named arguments to pass to the tool
    pub parameters: Value,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new<S: Into<String>>(name: S, parameters: Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            parameters,
        }
    }
}

/// Why a tool invocation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolFailureKind {
    MissingRequiredParameter,
    ParameterCoercion,
    InvalidArguments,
    /// The endpoint answered with a non-2xx status
    Http,
    /// Timeout, DNS or connection failure
    Transport,
    Execution,
}

/// Result of a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this is a result for
    pub tool_call_id: String,

    /// Whether the execution was successful
    pub success: bool,

    /// Result content as text for the conversation
    pub content: String,

    /// Optional structured data
    pub data: Option<Value>,

    /// HTTP status, when a response was received
    pub status: Option<u16>,

    /// Failure kind for unsuccessful results
    pub failure: Option<ToolFailureKind>,

    /// Execution duration in milliseconds
    pub duration_ms: Option<u64>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success<S: Into<String>>(content: S) -> Self {
        Self {
            tool_call_id: String::new(),
            success: true,
            content: content.into(),
            data: None,
            status: None,
            failure: None,
            duration_ms: None,
        }
    }

    /// Create an error result
    pub fn error<S: Into<String>>(kind: ToolFailureKind, error: S) -> Self {
        Self {
            tool_call_id: String::new(),
            success: false,
            content: format!("Error: {}", error.into()),
            data: None,
            status: None,
            failure: Some(kind),
            duration_ms: None,
        }
    }

    /// Create an error result from a tool error
    pub fn from_tool_error(error: &ToolError) -> Self {
        let kind = match error {
            ToolError::MissingRequiredParameter { .. } => ToolFailureKind::MissingRequiredParameter,
            ToolError::ParameterCoercion { .. } => ToolFailureKind::ParameterCoercion,
            ToolError::InvalidArguments { .. } => ToolFailureKind::InvalidArguments,
            ToolError::NotFound { .. } | ToolError::ExecutionFailed { .. } => {
                ToolFailureKind::Execution
            }
        };
        Self::error(kind, error.to_string())
    }

    /// Set the tool call id
    pub fn with_call_id<S: Into<String>>(mut self, tool_call_id: S) -> Self {
        self.tool_call_id = tool_call_id.into();
        self
    }

    /// Set structured data
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Set the HTTP status
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Set execution duration
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_failure(&self, kind: ToolFailureKind) -> bool {
        self.failure == Some(kind)
    }
}

/// Tool definition handed to a function-calling runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// The resolved toolset: every callable tool for this process, in order
#[derive(Clone, Default)]
pub struct Toolset {
    tools: Vec<Arc<dyn Tool>>,
}

impl Toolset {
    /// Assemble a toolset, refusing duplicate names
    pub fn assemble(tools: Vec<Arc<dyn Tool>>) -> Result<Self> {
        let mut names = HashSet::new();
        for tool in &tools {
            if !names.insert(tool.name().to_string()) {
                return Err(AgentError::DuplicateTool {
                    name: tool.name().to_string(),
                }
                .into());
            }
        }
        Ok(Self { tools })
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|tool| tool.name() == name)
    }

    /// List all tool names in order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool call
    pub async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let tool = self.get(&call.name).ok_or_else(|| ToolError::NotFound {
            name: call.name.clone(),
        })?;

        let start_time = std::time::Instant::now();
        let call_id = call.id.clone();
        let result = tool.execute(call).await;
        let duration = start_time.elapsed().as_millis() as u64;

        match result {
            Ok(mut result) => {
                result.duration_ms = Some(duration);
                Ok(result)
            }
            Err(e) => Ok(ToolResult::error(ToolFailureKind::Execution, e.to_string())
                .with_call_id(call_id)
                .with_duration(duration)),
        }
    }

    /// Execute several calls concurrently, returning results in call order
    pub async fn execute_batch(&self, calls: Vec<ToolCall>) -> Vec<Result<ToolResult>> {
        futures::future::join_all(calls.into_iter().map(|call| self.execute(call))).await
    }

    /// Get tool definitions for function calling
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters_schema(),
            })
            .collect()
    }
}

impl std::fmt::Debug for Toolset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
