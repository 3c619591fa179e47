use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const VALID_DOCUMENT: &str = r#"{
  "agentInstruction": "You are a concierge.",
  "beginMessage": "Welcome! How can I help?",
  "tools": [
    {
      "id": "t1",
      "name": "get_weather",
      "description": "Get the weather for a city",
      "requestType": "GET",
      "requestUrl": "https://api.example.com/weather",
      "parameters": [
        {"name": "city", "type": "string", "required": true},
        {"name": "days", "type": "number", "required": false, "defaultValue": "3"}
      ],
      "enabled": true
    },
    {
      "id": "t2",
      "name": "Search-Web",
      "description": "Bad name",
      "requestType": "GET",
      "requestUrl": "https://api.example.com/search"
    }
  ]
}"#;

/// A command isolated from the developer's own configuration
fn dialtone(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dialtone").unwrap();
    cmd.current_dir(workdir)
        .env("XDG_CONFIG_HOME", workdir.join("xdg"))
        .env_remove("DIALTONE_STORE_URL")
        .env_remove("DIALTONE_STORE_DIR")
        .env_remove("DIALTONE_TOOL_TIMEOUT_SECS")
        .env_remove("DIALTONE_SEARCH_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn validate_reports_kept_and_rejected_tools() {
    let temp = TempDir::new().unwrap();
    let file = write(temp.path(), "agent.json", VALID_DOCUMENT);

    dialtone(temp.path())
        .arg("validate")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 tools kept, 1 rejected"))
        .stdout(predicate::str::contains("✓ get_weather (GET https://api.example.com/weather)"))
        .stdout(predicate::str::contains("✗ Search-Web (t2)"));
}

#[test]
fn validate_fails_on_structural_errors() {
    let temp = TempDir::new().unwrap();
    let file = write(temp.path(), "broken.json", r#"{"tools": {"not": "a list"}}"#);

    dialtone(temp.path())
        .arg("validate")
        .arg(&file)
        .assert()
        .failure()
        .stdout(predicate::str::contains("structurally invalid"))
        .stdout(predicate::str::contains("tools: expected a sequence"));
}

#[test]
fn validate_fails_on_unreadable_json() {
    let temp = TempDir::new().unwrap();
    let file = write(temp.path(), "garbage.json", "not json at all");

    dialtone(temp.path())
        .arg("validate")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse document as JSON"));
}

#[test]
fn save_then_show_and_list_tools() {
    let temp = TempDir::new().unwrap();
    let store_dir = temp.path().join("store");
    let file = write(temp.path(), "agent.json", VALID_DOCUMENT);

    dialtone(temp.path())
        .arg("--store-dir")
        .arg(&store_dir)
        .arg("save")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 tools will load"));
    assert!(store_dir.join("configurations/current.json").exists());

    dialtone(temp.path())
        .arg("--store-dir")
        .arg(&store_dir)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Source: store"))
        .stdout(predicate::str::contains("You are a concierge."))
        .stdout(predicate::str::contains("Welcome! How can I help?"));

    dialtone(temp.path())
        .arg("--store-dir")
        .arg(&store_dir)
        .arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("get_weather(city: string, days?: number = 3)"))
        .stdout(predicate::str::contains("search_web(query: string)"));
}

#[test]
fn empty_store_falls_back_to_default() {
    let temp = TempDir::new().unwrap();

    dialtone(temp.path())
        .arg("--store-dir")
        .arg(temp.path().join("empty"))
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Source: default"))
        .stdout(predicate::str::contains("You are a helpful AI assistant."));
}

#[test]
fn invoke_reports_missing_parameter_without_network() {
    let temp = TempDir::new().unwrap();

    dialtone(temp.path())
        .arg("--store-dir")
        .arg(temp.path().join("empty"))
        .args(["invoke", "search_web", "--args", "{}"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Missing required parameter: query"));
}

#[test]
fn invoke_unknown_tool_fails() {
    let temp = TempDir::new().unwrap();

    dialtone(temp.path())
        .arg("--store-dir")
        .arg(temp.path().join("empty"))
        .args(["invoke", "does_not_exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Tool not found: does_not_exist"));
}
