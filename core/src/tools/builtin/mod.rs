//! Built-in tools

pub mod search_web;

pub use search_web::{SearchSnippet, SearchWebTool, SearchWebToolFactory};
