//! Configuration document types
//!
//! The agent configuration is a single JSON document edited through a form UI
//! and read by the agent at startup. Field names follow the document's
//! camelCase wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fallback personality used when the stored instruction is empty or missing
pub const DEFAULT_AGENT_INSTRUCTION: &str = "You are a helpful AI assistant.\n\
Speak in a professional and friendly manner.\n\
Be concise and clear in your responses.\n\
Use the available tools when needed to assist users effectively.";

/// Fallback greeting used when the stored begin message is empty or missing
pub const DEFAULT_BEGIN_MESSAGE: &str = "Hello! I'm your AI assistant. How can I help you today?";

/// Name of the built-in web search tool; reserved for user-defined tools
pub const SEARCH_WEB_TOOL_NAME: &str = "search_web";

/// HTTP methods a dynamic tool may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
    #[serde(rename = "PUT")]
    Put,
    #[serde(rename = "DELETE")]
    Delete,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Get => "GET",
            RequestType::Post => "POST",
            RequestType::Put => "PUT",
            RequestType::Delete => "DELETE",
        }
    }

    /// Whether bound parameters travel in the query string rather than a body
    pub fn uses_query(&self) -> bool {
        matches!(self, RequestType::Get | RequestType::Delete)
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(RequestType::Get),
            "POST" => Ok(RequestType::Post),
            "PUT" => Ok(RequestType::Put),
            "DELETE" => Ok(RequestType::Delete),
            _ => Err(format!(
                "unsupported request type '{}'; expected GET, POST, PUT or DELETE",
                s
            )),
        }
    }
}

impl From<RequestType> for reqwest::Method {
    fn from(value: RequestType) -> Self {
        match value {
            RequestType::Get => reqwest::Method::GET,
            RequestType::Post => reqwest::Method::POST,
            RequestType::Put => reqwest::Method::PUT,
            RequestType::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Declared type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Boolean,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "string" => Ok(ParameterType::String),
            "number" => Ok(ParameterType::Number),
            "boolean" => Ok(ParameterType::Boolean),
            other => Err(format!(
                "unsupported parameter type '{}'; expected string, number or boolean",
                other
            )),
        }
    }
}

/// Typed argument description for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    /// Argument name, also used as the outbound request field name
    pub name: String,

    #[serde(rename = "type")]
    pub param_type: ParameterType,

    #[serde(default)]
    pub required: bool,

    /// Applied when an optional argument is omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, param_type: ParameterType, required: bool) -> Self {
        Self {
            name: name.into(),
            param_type,
            required,
            default_value: None,
            description: None,
        }
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Declarative description of one REST-backed tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSpec {
    pub id: String,
    pub name: String,
    pub description: String,
    pub request_type: RequestType,
    pub request_url: String,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl ToolSpec {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        request_type: RequestType,
        request_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            request_type,
            request_url: request_url.into(),
            parameters: Vec::new(),
            enabled: true,
        }
    }

    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// The singleton agent configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfiguration {
    #[serde(default)]
    pub agent_instruction: String,

    #[serde(default)]
    pub begin_message: String,

    /// Display order only; execution does not depend on it
    #[serde(default)]
    pub tools: Vec<ToolSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AgentConfiguration {
    /// The configuration used whenever the stored one cannot be loaded
    pub fn default_configuration() -> Self {
        Self {
            agent_instruction: DEFAULT_AGENT_INSTRUCTION.to_string(),
            begin_message: DEFAULT_BEGIN_MESSAGE.to_string(),
            tools: Vec::new(),
            updated_at: None,
        }
    }

    /// Instruction with the empty-text fallback applied
    pub fn effective_instruction(&self) -> &str {
        non_empty_or(&self.agent_instruction, DEFAULT_AGENT_INSTRUCTION)
    }

    /// Begin message with the empty-text fallback applied
    pub fn effective_begin_message(&self) -> &str {
        non_empty_or(&self.begin_message, DEFAULT_BEGIN_MESSAGE)
    }

    /// Tools that take part in the resolved toolset
    pub fn enabled_tools(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.iter().filter(|tool| tool.enabled)
    }

    /// Compare two configurations ignoring tool order and save timestamps
    pub fn same_content(&self, other: &AgentConfiguration) -> bool {
        if self.agent_instruction != other.agent_instruction
            || self.begin_message != other.begin_message
            || self.tools.len() != other.tools.len()
        {
            return false;
        }

        let mut left: Vec<&ToolSpec> = self.tools.iter().collect();
        let mut right: Vec<&ToolSpec> = other.tools.iter().collect();
        left.sort_by(|a, b| a.id.cmp(&b.id));
        right.sort_by(|a, b| a.id.cmp(&b.id));
        left == right
    }
}

impl Default for AgentConfiguration {
    fn default() -> Self {
        Self::default_configuration()
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
