//! Tools built at startup from configured REST descriptions

use crate::config::{ParameterSpec, ToolSpec};
use crate::error::ToolError;
use crate::tools::binding::bind_arguments;
use crate::tools::http::{preview, HttpResponse, HttpTransport, OutboundRequest};
use crate::tools::{Tool, ToolFailureKind, ToolResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

const LOG_PREVIEW_CHARS: usize = 500;

/// A callable tool backed by one configured HTTP endpoint
pub struct DynamicTool {
    spec: ToolSpec,
    transport: Arc<dyn HttpTransport>,
}

impl DynamicTool {
    pub fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    /// Bind arguments and construct the outbound request without sending it
    pub fn prepare_request(&self, arguments: &Value) -> Result<OutboundRequest, ToolError> {
        let bound = bind_arguments(&self.spec.parameters, arguments)?;
        let request = OutboundRequest::new(self.spec.request_type, self.spec.request_url.clone());

        if bound.is_empty() {
            Ok(request)
        } else if self.spec.request_type.uses_query() {
            Ok(request.with_query(bound.query_pairs()))
        } else {
            Ok(request.with_body(Value::Object(bound.to_json_object())))
        }
    }
}

#[async_trait]
impl Tool for DynamicTool {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn description(&self) -> &str {
        &self.spec.description
    }

    fn signature(&self) -> &[ParameterSpec] {
        &self.spec.parameters
    }

    async fn invoke(&self, arguments: &Value) -> ToolResult {
        let name = &self.spec.name;
        let start_time = Instant::now();
        info!("Tool '{}' invoked with arguments: {}", name, arguments);

        let request = match self.prepare_request(arguments) {
            Ok(request) => request,
            Err(e) => {
                error!("Tool '{}' rejected arguments: {}", name, e);
                return ToolResult::from_tool_error(&e)
                    .with_duration(start_time.elapsed().as_millis() as u64);
            }
        };

        info!(
            "Making {} request to: {}",
            request.method,
            request
                .full_url()
                .map(|url| url.to_string())
                .unwrap_or_else(|_| request.url.clone())
        );

        let result = match self.transport.send(request).await {
            Ok(response) => interpret_response(name, response),
            Err(e) => {
                error!("Tool '{}' transport failure: {}", name, e);
                ToolResult::error(
                    ToolFailureKind::Transport,
                    format!("An error occurred while using {}: {}", name, e),
                )
            }
        };

        result.with_duration(start_time.elapsed().as_millis() as u64)
    }
}

/// Turn an HTTP response into a tool result
fn interpret_response(name: &str, response: HttpResponse) -> ToolResult {
    info!("Tool '{}' received HTTP {}", name, response.status);

    if !response.is_success() {
        error!(
            "Tool '{}' failed: HTTP {} - {}",
            name,
            response.status,
            preview(&response.body, LOG_PREVIEW_CHARS)
        );
        return ToolResult::error(
            ToolFailureKind::Http,
            format!("HTTP {} - {}", response.status, response.body),
        )
        .with_status(response.status);
    }

    if response.is_json() {
        if let Ok(data) = serde_json::from_str::<Value>(&response.body) {
            let content = serde_json::to_string_pretty(&data).unwrap_or_else(|_| response.body.clone());
            info!(
                "Tool '{}' response: {}",
                name,
                preview(&content, LOG_PREVIEW_CHARS)
            );
            return ToolResult::success(content)
                .with_data(data)
                .with_status(response.status);
        }
    }

    info!(
        "Tool '{}' response: {}",
        name,
        preview(&response.body, LOG_PREVIEW_CHARS)
    );
    ToolResult::success(response.body).with_status(response.status)
}

/// Builds [`DynamicTool`]s that share one transport
#[derive(Clone)]
pub struct DynamicToolFactory {
    transport: Arc<dyn HttpTransport>,
}

impl DynamicToolFactory {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Build a callable from a validated spec; performs no I/O
    pub fn build(&self, spec: &ToolSpec) -> DynamicTool {
        DynamicTool {
            spec: spec.clone(),
            transport: self.transport.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParameterType, RequestType};
    use crate::error::TransportError;
    use crate::tools::testing::RecordingTransport;
    use serde_json::json;

    fn weather_spec() -> ToolSpec {
        ToolSpec::new(
            "tool-1",
            "get_weather",
            "Get the current weather for a city",
            RequestType::Get,
            "https://api.example.com/weather",
        )
        .with_parameter(ParameterSpec::new("city", ParameterType::String, true))
        .with_parameter(ParameterSpec::new("days", ParameterType::Number, false).with_default("3"))
    }

    #[tokio::test]
    async fn test_get_sends_query_parameters() {
        let transport = RecordingTransport::json(200, json!({"temp": 21}));
        let tool = DynamicToolFactory::new(transport.clone()).build(&weather_spec());

        let result = tool.invoke(&json!({"city": "Paris"})).await;
        assert!(result.success);
        assert_eq!(result.status, Some(200));
        assert_eq!(result.data, Some(json!({"temp": 21})));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, RequestType::Get);
        assert_eq!(
            requests[0].full_url().unwrap().as_str(),
            "https://api.example.com/weather?city=Paris&days=3"
        );
        assert!(requests[0].body.is_none());
    }

    #[tokio::test]
    async fn test_supplied_number_overrides_default() {
        let transport = RecordingTransport::json(200, json!({}));
        let tool = DynamicToolFactory::new(transport.clone()).build(&weather_spec());

        tool.invoke(&json!({"city": "Paris", "days": "5"})).await;
        let requests = transport.requests();
        assert!(requests[0].query.contains(&("days".to_string(), "5".to_string())));
    }

    #[tokio::test]
    async fn test_missing_required_makes_no_request() {
        let transport = RecordingTransport::json(200, json!({}));
        let tool = DynamicToolFactory::new(transport.clone()).build(&weather_spec());

        let result = tool.invoke(&json!({})).await;
        assert!(!result.success);
        assert!(result.is_failure(ToolFailureKind::MissingRequiredParameter));
        assert!(result.content.contains("city"));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_coercion_failure_makes_no_request() {
        let transport = RecordingTransport::json(200, json!({}));
        let tool = DynamicToolFactory::new(transport.clone()).build(&weather_spec());

        let result = tool.invoke(&json!({"city": "Paris", "days": "abc"})).await;
        assert!(result.is_failure(ToolFailureKind::ParameterCoercion));
        assert!(result.content.contains("days"));
        assert!(result.content.contains("abc"));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let spec = ToolSpec::new(
            "tool-2",
            "create_note",
            "Create a note",
            RequestType::Post,
            "https://api.example.com/notes",
        )
        .with_parameter(ParameterSpec::new("title", ParameterType::String, true))
        .with_parameter(ParameterSpec::new("pinned", ParameterType::Boolean, false))
        .with_parameter(ParameterSpec::new("priority", ParameterType::Number, false).with_default("2"));
        let transport = RecordingTransport::json(201, json!({"id": 9}));
        let tool = DynamicToolFactory::new(transport.clone()).build(&spec);

        let result = tool.invoke(&json!({"title": "Buy milk", "pinned": "yes"})).await;
        assert!(result.success);
        assert_eq!(result.status, Some(201));

        let requests = transport.requests();
        let request = &requests[0];
        assert_eq!(request.method, RequestType::Post);
        assert!(request.query.is_empty());
        assert_eq!(
            request.body,
            Some(json!({"title": "Buy milk", "pinned": true, "priority": 2}))
        );
        assert_eq!(request.full_url().unwrap().as_str(), "https://api.example.com/notes");
    }

    #[tokio::test]
    async fn test_put_without_bound_parameters_sends_no_body() {
        let spec = ToolSpec::new("t", "touch", "Touch", RequestType::Put, "https://api.example.com/touch");
        let transport = RecordingTransport::text(200, "ok");
        let tool = DynamicToolFactory::new(transport.clone()).build(&spec);

        let result = tool.invoke(&json!({})).await;
        assert!(result.success);
        assert_eq!(result.content, "ok");
        assert!(result.data.is_none());
        assert!(transport.requests()[0].body.is_none());
    }

    #[tokio::test]
    async fn test_non_2xx_is_error_result() {
        let transport = RecordingTransport::text(503, "maintenance");
        let tool = DynamicToolFactory::new(transport.clone()).build(&weather_spec());

        let result = tool.invoke(&json!({"city": "Paris"})).await;
        assert!(!result.success);
        assert!(result.is_failure(ToolFailureKind::Http));
        assert_eq!(result.status, Some(503));
        assert!(result.content.contains("HTTP 503 - maintenance"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_error_result() {
        let transport = RecordingTransport::failing(TransportError::Timeout { seconds: 15 });
        let tool = DynamicToolFactory::new(transport.clone()).build(&weather_spec());

        let result = tool.invoke(&json!({"city": "Paris"})).await;
        assert!(result.is_failure(ToolFailureKind::Transport));
        assert!(result.status.is_none());
        assert!(result.content.contains("timed out after 15s"));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_declared_json_that_fails_to_parse_falls_back_to_text() {
        let transport = RecordingTransport::responding(HttpResponse::new(
            200,
            Some("application/json"),
            "not json",
        ));
        let tool = DynamicToolFactory::new(transport).build(&weather_spec());

        let result = tool.invoke(&json!({"city": "Paris"})).await;
        assert!(result.success);
        assert_eq!(result.content, "not json");
        assert!(result.data.is_none());
    }

    #[tokio::test]
    async fn test_build_is_pure_and_repeatable() {
        let transport = RecordingTransport::json(200, json!({}));
        let factory = DynamicToolFactory::new(transport.clone());
        let first = factory.build(&weather_spec());
        let second = factory.build(&weather_spec());
        assert_eq!(transport.request_count(), 0);

        let args = json!({"city": "Oslo"});
        assert_eq!(
            first.prepare_request(&args).unwrap(),
            second.prepare_request(&args).unwrap()
        );
        assert_eq!(first.name(), "get_weather");
        assert_eq!(first.signature().len(), 2);
    }
}
