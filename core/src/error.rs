//! Error types and handling for Dialtone Core

use thiserror::Error;

/// Result type alias for Dialtone operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Dialtone Core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Tool execution errors
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Agent bootstrap errors
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// A single validation failure, located by a dotted field path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Document not found: {key}")]
    NotFound { key: String },

    #[error("Malformed document '{key}': {message}")]
    Malformed { key: String, message: String },

    #[error("Document rejected: {}", join_errors(.errors))]
    Rejected { errors: Vec<ValidationError> },

    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tool execution errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool not found: {name}")]
    NotFound { name: String },

    #[error("Missing required parameter: {parameter}")]
    MissingRequiredParameter { parameter: String },

    #[error("Cannot coerce value {value} for parameter '{parameter}' to {expected}")]
    ParameterCoercion {
        parameter: String,
        value: String,
        expected: String,
    },

    #[error("Invalid tool arguments: {message}")]
    InvalidArguments { message: String },

    #[error("Tool execution failed: {name} - {message}")]
    ExecutionFailed { name: String, message: String },
}

/// Transport-level failures of an outbound HTTP call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("connection failed: {message}")]
    Connect { message: String },

    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("transport error: {message}")]
    Other { message: String },
}

/// Agent bootstrap errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Duplicate tool name in toolset: {name}")]
    DuplicateTool { name: String },

    #[error("Conversation runtime failed: {message}")]
    RuntimeFailed { message: String },
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Generic(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Generic(msg.to_string())
    }
}
