//! Tool system: configured HTTP tools and built-in tools

pub mod base;
pub mod binding;
pub mod builtin;
pub mod dynamic;
pub mod http;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use base::{
    parameters_schema, Tool, ToolCall, ToolDefinition, ToolFailureKind, ToolResult, Toolset,
};
pub use binding::{bind_arguments, BoundArguments};
pub use dynamic::{DynamicTool, DynamicToolFactory};
pub use http::{HttpResponse, HttpTransport, OutboundRequest, ReqwestTransport};
pub use registry::{ToolFactory, ToolRegistry};
