//! Dynamic tools and the file store against a live loopback server

use dialtone_core::config::{ParameterSpec, ParameterType, RequestType, ResolvedSettings, ToolSpec};
use dialtone_core::store::{FileDocumentStore, CONFIG_DOCUMENT_KEY};
use dialtone_core::tools::{DynamicToolFactory, ReqwestTransport, Tool, ToolFailureKind};
use dialtone_core::{AgentBuilder, AgentConfiguration, ConfigStore};
use serde_json::json;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
struct CapturedRequest {
    request_line: String,
    body: String,
}

fn read_request(stream: &mut std::net::TcpStream) -> CapturedRequest {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 4096];
    loop {
        let read = stream.read(&mut chunk).unwrap_or(0);
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);

        let text = String::from_utf8_lossy(&buffer).to_string();
        if let Some((head, body)) = text.split_once("\r\n\r\n") {
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if body.len() >= content_length {
                break;
            }
        }
    }

    let text = String::from_utf8_lossy(&buffer).to_string();
    let (head, body) = text.split_once("\r\n\r\n").unwrap_or((text.as_str(), ""));
    CapturedRequest {
        request_line: head.lines().next().unwrap_or_default().to_string(),
        body: body.to_string(),
    }
}

fn spawn_server(
    responses: Vec<(&'static str, &'static str, String)>,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("server should bind");
    let address = listener.local_addr().expect("server should have an address");

    std::thread::spawn(move || {
        for (status_line, content_type, body) in responses {
            if let Ok((mut stream, _)) = listener.accept() {
                let request = read_request(&mut stream);
                captured.lock().unwrap().push(request);

                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        }
    });

    format!("http://{address}")
}

fn transport() -> Arc<ReqwestTransport> {
    Arc::new(ReqwestTransport::new(Duration::from_secs(5)).unwrap())
}

#[tokio::test]
async fn get_tool_sends_query_and_parses_json() {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let base = spawn_server(
        vec![("200 OK", "application/json", json!({"temp": 18}).to_string())],
        captured.clone(),
    );

    let spec = ToolSpec::new(
        "tool-1",
        "get_weather",
        "Get the weather",
        RequestType::Get,
        format!("{base}/weather"),
    )
    .with_parameter(ParameterSpec::new("city", ParameterType::String, true))
    .with_parameter(ParameterSpec::new("days", ParameterType::Number, false).with_default("3"));
    let tool = DynamicToolFactory::new(transport()).build(&spec);

    let result = tool.invoke(&json!({"city": "Paris"})).await;
    assert!(result.success, "unexpected failure: {}", result.content);
    assert_eq!(result.status, Some(200));
    assert_eq!(result.data, Some(json!({"temp": 18})));

    let requests = captured.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].request_line, "GET /weather?city=Paris&days=3 HTTP/1.1");
}

#[tokio::test]
async fn post_tool_sends_json_body_and_reports_http_errors() {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let base = spawn_server(
        vec![("422 Unprocessable Entity", "text/plain", "guests too large".to_string())],
        captured.clone(),
    );

    let spec = ToolSpec::new(
        "tool-2",
        "book_table",
        "Book a table",
        RequestType::Post,
        format!("{base}/bookings"),
    )
    .with_parameter(ParameterSpec::new("guests", ParameterType::Number, true))
    .with_parameter(ParameterSpec::new("outdoor", ParameterType::Boolean, false));
    let tool = DynamicToolFactory::new(transport()).build(&spec);

    let result = tool.invoke(&json!({"guests": "40", "outdoor": "no"})).await;
    assert!(result.is_failure(ToolFailureKind::Http));
    assert_eq!(result.status, Some(422));
    assert!(result.content.contains("guests too large"));

    let requests = captured.lock().unwrap().clone();
    assert_eq!(requests[0].request_line, "POST /bookings HTTP/1.1");
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body, json!({"guests": 40, "outdoor": false}));
}

#[tokio::test]
async fn silent_endpoint_times_out_as_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let _ = read_request(&mut stream);
            // Hold the connection open without answering
            std::thread::sleep(Duration::from_secs(5));
        }
    });

    let spec = ToolSpec::new(
        "tool-4",
        "slow_lookup",
        "Never answers",
        RequestType::Get,
        format!("http://{address}/slow"),
    );
    let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(1)).unwrap());
    let tool = DynamicToolFactory::new(transport).build(&spec);

    let started = std::time::Instant::now();
    let result = tool.invoke(&json!({})).await;
    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(result.failure, Some(ToolFailureKind::Transport));
    assert!(result.status.is_none());
    assert!(
        result.content.contains("timed out after 1s"),
        "unexpected content: {}",
        result.content
    );
}

#[tokio::test]
async fn connection_refused_is_transport_failure() {
    // Bind then drop to get a port nothing listens on
    let address = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let spec = ToolSpec::new(
        "tool-3",
        "ping",
        "Ping",
        RequestType::Delete,
        format!("http://{address}/ping"),
    );
    let tool = DynamicToolFactory::new(transport()).build(&spec);

    let result = tool.invoke(&json!({})).await;
    assert!(result.is_failure(ToolFailureKind::Transport));
    assert!(result.status.is_none());
    assert!(result.content.contains("An error occurred while using ping"));
}

#[tokio::test]
async fn saved_file_configuration_drives_bootstrap() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let store = Arc::new(FileDocumentStore::new(temp_dir.path()));

    let configuration = AgentConfiguration {
        agent_instruction: "You check stock levels.".to_string(),
        tools: vec![ToolSpec::new(
            "tool-1",
            "check_stock",
            "Check stock for a product",
            RequestType::Get,
            "https://inventory.example.com/stock",
        )
        .with_parameter(ParameterSpec::new("sku", ParameterType::String, true))],
        ..AgentConfiguration::default()
    };
    ConfigStore::new(store.clone())
        .save(&configuration)
        .await
        .unwrap();
    assert!(store.document_path(CONFIG_DOCUMENT_KEY).exists());

    let setup = AgentBuilder::new(store)
        .with_settings(ResolvedSettings::default().with_tool_timeout_secs(3))
        .prepare()
        .await
        .unwrap();
    assert!(!setup.source.is_default());
    assert_eq!(setup.toolset.names(), vec!["check_stock", "search_web"]);
    assert!(setup.configuration.same_content(&configuration));
}
