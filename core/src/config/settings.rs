//! Runtime settings for tool invocation
//!
//! Core only accepts fully resolved, validated settings.
//! All discovery, loading, and merging happens in CLI layer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout applied to every outbound tool request
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 15;

/// Search provider used by the built-in `search_web` tool
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.duckduckgo.com/";

/// Number of snippets `search_web` returns at most
pub const DEFAULT_SEARCH_MAX_RESULTS: usize = 5;

/// Fully resolved settings ready for use by core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSettings {
    /// Per-call timeout for tool HTTP requests, in seconds
    pub tool_timeout_secs: u64,
    /// Base URL of the web search provider
    pub search_endpoint: String,
    /// Maximum number of search snippets
    pub search_max_results: usize,
}

impl ResolvedSettings {
    pub fn new() -> Self {
        Self {
            tool_timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            search_max_results: DEFAULT_SEARCH_MAX_RESULTS,
        }
    }

    pub fn with_tool_timeout_secs(mut self, secs: u64) -> Self {
        self.tool_timeout_secs = secs;
        self
    }

    pub fn with_search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.search_endpoint = endpoint.into();
        self
    }

    pub fn with_search_max_results(mut self, max_results: usize) -> Self {
        self.search_max_results = max_results;
        self
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.tool_timeout_secs == 0 {
            return Err("Tool timeout must be at least one second".to_string());
        }

        if self.tool_timeout_secs > 300 {
            return Err("Tool timeout must not exceed 300 seconds".to_string());
        }

        if !self.search_endpoint.starts_with("http://")
            && !self.search_endpoint.starts_with("https://")
        {
            return Err("Search endpoint must start with http:// or https://".to_string());
        }

        if self.search_max_results == 0 {
            return Err("Search result limit must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Default for ResolvedSettings {
    fn default() -> Self {
        Self::new()
    }
}
