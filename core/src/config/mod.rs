//! Configuration schema, validation and runtime settings
//!
//! Loading from the store lives in [`crate::store`]; this module only knows
//! the document shape and the rules it must satisfy.

pub mod settings;
pub mod types;
pub mod validator;

pub use settings::{
    ResolvedSettings, DEFAULT_SEARCH_ENDPOINT, DEFAULT_SEARCH_MAX_RESULTS, DEFAULT_TOOL_TIMEOUT_SECS,
};
pub use types::{
    AgentConfiguration, ParameterSpec, ParameterType, RequestType, ToolSpec,
    DEFAULT_AGENT_INSTRUCTION, DEFAULT_BEGIN_MESSAGE, SEARCH_WEB_TOOL_NAME,
};
pub use validator::{
    is_reserved_tool_name, is_valid_tool_name, validate, validate_report, ToolRejection,
    ValidationReport,
};
