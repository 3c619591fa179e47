//! Built-in web search tool
//!
//! Queries the DuckDuckGo Instant Answer API and returns result snippets.
//! The tool is always present in the resolved toolset and its name is
//! reserved for user-defined tools.

use crate::config::{ParameterSpec, ParameterType, RequestType, ResolvedSettings, SEARCH_WEB_TOOL_NAME};
use crate::tools::binding::bind_arguments;
use crate::tools::http::{preview, HttpTransport, OutboundRequest};
use crate::tools::{Tool, ToolFactory, ToolFailureKind, ToolResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

const SEARCH_WEB_DESCRIPTION: &str = "Search the web using DuckDuckGo";

/// One search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSnippet {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Tool for searching the web
pub struct SearchWebTool {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
    max_results: usize,
    parameters: Vec<ParameterSpec>,
}

impl SearchWebTool {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoint: impl Into<String>, max_results: usize) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            max_results,
            parameters: vec![ParameterSpec::new("query", ParameterType::String, true)
                .with_description("The search query")],
        }
    }

    fn build_request(&self, query: &str) -> OutboundRequest {
        OutboundRequest::new(RequestType::Get, self.endpoint.clone()).with_query(vec![
            ("q".to_string(), query.to_string()),
            ("format".to_string(), "json".to_string()),
            ("no_html".to_string(), "1".to_string()),
            ("skip_disambig".to_string(), "1".to_string()),
        ])
    }

    async fn search(&self, arguments: &Value) -> ToolResult {
        let bound = match bind_arguments(&self.parameters, arguments) {
            Ok(bound) => bound,
            Err(e) => return ToolResult::from_tool_error(&e),
        };
        let query = bound
            .get("query")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string();
        if query.is_empty() {
            return ToolResult::error(ToolFailureKind::InvalidArguments, "query must not be empty");
        }

        info!("Tool '{}' invoked with query: '{}'", SEARCH_WEB_TOOL_NAME, query);

        let response = match self.transport.send(self.build_request(&query)).await {
            Ok(response) => response,
            Err(e) => {
                error!("Tool '{}' transport failure: {}", SEARCH_WEB_TOOL_NAME, e);
                return ToolResult::error(
                    ToolFailureKind::Transport,
                    format!("An error occurred while searching the web for '{}': {}", query, e),
                );
            }
        };

        if !response.is_success() {
            error!(
                "Tool '{}' failed: HTTP {} - {}",
                SEARCH_WEB_TOOL_NAME,
                response.status,
                preview(&response.body, 500)
            );
            return ToolResult::error(
                ToolFailureKind::Http,
                format!("HTTP {} - {}", response.status, response.body),
            )
            .with_status(response.status);
        }

        // DuckDuckGo labels its JSON as application/x-javascript, so ignore the header
        let payload: Value = match serde_json::from_str(&response.body) {
            Ok(payload) => payload,
            Err(_) => {
                return ToolResult::error(
                    ToolFailureKind::Execution,
                    "search provider did not return JSON; verify the search endpoint",
                )
                .with_status(response.status)
            }
        };

        let results = parse_duckduckgo_results(&query, &payload, self.max_results);
        info!(
            "Tool '{}' completed with {} results",
            SEARCH_WEB_TOOL_NAME,
            results.len()
        );

        let content = if results.is_empty() {
            format!("No results found for '{}'.", query)
        } else {
            results
                .iter()
                .enumerate()
                .map(|(i, r)| format!("{}. {} - {} ({})", i + 1, r.title, r.snippet, r.url))
                .collect::<Vec<_>>()
                .join("\n")
        };

        ToolResult::success(content)
            .with_data(json!({ "query": query, "results": results }))
            .with_status(response.status)
    }
}

#[async_trait]
impl Tool for SearchWebTool {
    fn name(&self) -> &str {
        SEARCH_WEB_TOOL_NAME
    }

    fn description(&self) -> &str {
        SEARCH_WEB_DESCRIPTION
    }

    fn signature(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    async fn invoke(&self, arguments: &Value) -> ToolResult {
        let start_time = Instant::now();
        self.search(arguments)
            .await
            .with_duration(start_time.elapsed().as_millis() as u64)
    }

    fn is_builtin(&self) -> bool {
        true
    }
}

/// Extract snippets from an Instant Answer payload, deduplicated by URL
pub fn parse_duckduckgo_results(query: &str, payload: &Value, max_results: usize) -> Vec<SearchSnippet> {
    let mut results = Vec::new();
    let mut seen_urls = HashSet::new();

    if let Some(url) = payload.get("AbstractURL").and_then(Value::as_str) {
        let snippet = payload
            .get("AbstractText")
            .and_then(Value::as_str)
            .map(collapse_whitespace)
            .unwrap_or_default();
        if !url.trim().is_empty() && !snippet.is_empty() {
            seen_urls.insert(url.to_string());
            let title = payload
                .get("Heading")
                .and_then(Value::as_str)
                .filter(|heading| !heading.trim().is_empty())
                .unwrap_or(query);
            results.push(SearchSnippet {
                title: title.to_string(),
                url: url.to_string(),
                snippet,
            });
        }
    }

    if let Some(topics) = payload.get("RelatedTopics").and_then(Value::as_array) {
        collect_related_topics(topics, &mut results, &mut seen_urls, max_results);
    }

    results.truncate(max_results);
    results
}

fn collect_related_topics(
    topics: &[Value],
    results: &mut Vec<SearchSnippet>,
    seen_urls: &mut HashSet<String>,
    max_results: usize,
) {
    for topic in topics {
        if results.len() >= max_results {
            return;
        }

        // Grouped topics nest their entries one level down
        if let Some(nested) = topic.get("Topics").and_then(Value::as_array) {
            collect_related_topics(nested, results, seen_urls, max_results);
            continue;
        }

        let Some(url) = topic.get("FirstURL").and_then(Value::as_str) else {
            continue;
        };
        if url.trim().is_empty() || !seen_urls.insert(url.to_string()) {
            continue;
        }

        let text = topic
            .get("Text")
            .and_then(Value::as_str)
            .map(collapse_whitespace)
            .unwrap_or_default();
        let title = text.split(" - ").next().unwrap_or_default().trim().to_string();
        results.push(SearchSnippet {
            title: if title.is_empty() {
                "DuckDuckGo result".to_string()
            } else {
                title
            },
            url: url.to_string(),
            snippet: text,
        });
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Factory for the built-in search tool
pub struct SearchWebToolFactory {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
    max_results: usize,
}

impl SearchWebToolFactory {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &ResolvedSettings) -> Self {
        Self {
            transport,
            endpoint: settings.search_endpoint.clone(),
            max_results: settings.search_max_results,
        }
    }
}

impl ToolFactory for SearchWebToolFactory {
    fn create(&self) -> Arc<dyn Tool> {
        Arc::new(SearchWebTool::new(
            self.transport.clone(),
            self.endpoint.clone(),
            self.max_results,
        ))
    }

    fn tool_name(&self) -> &str {
        SEARCH_WEB_TOOL_NAME
    }

    fn tool_description(&self) -> &str {
        SEARCH_WEB_DESCRIPTION
    }
}
