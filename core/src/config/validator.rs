//! Configuration document validation
//!
//! Structural problems with the document as a whole are fatal and reported
//! together. Problems with an individual tool only drop that tool.

use super::types::{
    AgentConfiguration, ParameterSpec, ParameterType, RequestType, ToolSpec, SEARCH_WEB_TOOL_NAME,
};
use crate::error::ValidationError;
use crate::tools::binding::coerce_text;
use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Epoch values above this are taken as milliseconds
const EPOCH_MILLIS_THRESHOLD: f64 = 1e11;

fn tool_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("tool name pattern should compile"))
}

/// Whether `name` is a syntactically valid tool name
pub fn is_valid_tool_name(name: &str) -> bool {
    tool_name_pattern().is_match(name)
}

/// Whether `name` belongs to a built-in tool (exact, case-sensitive match)
pub fn is_reserved_tool_name(name: &str) -> bool {
    name == SEARCH_WEB_TOOL_NAME
}

/// A tool dropped during validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRejection {
    /// Tool id, or `#<index>` when the entry has no usable id
    pub tool_id: String,
    pub tool_name: Option<String>,
    pub reasons: Vec<String>,
}

/// Result of validating a document that is structurally sound
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub configuration: AgentConfiguration,
    pub rejected: Vec<ToolRejection>,
}

/// Validate a raw document, dropping invalid tools with a warning
pub fn validate(raw: &Value) -> Result<AgentConfiguration, Vec<ValidationError>> {
    let report = validate_report(raw)?;
    for rejection in &report.rejected {
        tracing::warn!(
            "Dropping tool '{}' ({}): {}",
            rejection.tool_id,
            rejection.tool_name.as_deref().unwrap_or("unnamed"),
            rejection.reasons.join("; ")
        );
    }
    Ok(report.configuration)
}

/// Validate a raw document and report every dropped tool
pub fn validate_report(raw: &Value) -> Result<ValidationReport, Vec<ValidationError>> {
    let Some(document) = raw.as_object() else {
        return Err(vec![ValidationError::new(
            "$",
            format!("expected a mapping, got {}", json_type_name(raw)),
        )]);
    };

    let mut errors = Vec::new();
    let agent_instruction = optional_string_field(document, "agentInstruction", &mut errors);
    let begin_message = optional_string_field(document, "beginMessage", &mut errors);
    let updated_at = updated_at_field(document, &mut errors);

    let raw_tools: &[Value] = match document.get("tools") {
        None | Some(Value::Null) => &[],
        Some(Value::Array(items)) => items,
        Some(other) => {
            errors.push(ValidationError::new(
                "tools",
                format!("expected a sequence, got {}", json_type_name(other)),
            ));
            &[]
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    let mut tools = Vec::new();
    let mut rejected = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut enabled_names = HashSet::new();

    for (index, raw_tool) in raw_tools.iter().enumerate() {
        match validate_tool(raw_tool) {
            Ok(tool) => {
                let mut reasons = Vec::new();
                if seen_ids.contains(&tool.id) {
                    reasons.push(format!("duplicate tool id '{}'", tool.id));
                }
                if tool.enabled && enabled_names.contains(&tool.name) {
                    reasons.push(format!("duplicate tool name '{}'", tool.name));
                }

                // A rejected entry claims neither its id nor its name
                if reasons.is_empty() {
                    seen_ids.insert(tool.id.clone());
                    if tool.enabled {
                        enabled_names.insert(tool.name.clone());
                    }
                    tools.push(tool);
                } else {
                    rejected.push(ToolRejection {
                        tool_id: tool.id,
                        tool_name: Some(tool.name),
                        reasons,
                    });
                }
            }
            Err(reasons) => rejected.push(ToolRejection {
                tool_id: raw_tool
                    .get("id")
                    .and_then(Value::as_str)
                    .filter(|id| !id.trim().is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("#{}", index)),
                tool_name: raw_tool
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                reasons,
            }),
        }
    }

    Ok(ValidationReport {
        configuration: AgentConfiguration {
            agent_instruction,
            begin_message,
            tools,
            updated_at,
        },
        rejected,
    })
}

fn optional_string_field(
    document: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<ValidationError>,
) -> String {
    match document.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => {
            errors.push(ValidationError::new(
                field,
                format!("expected a string, got {}", json_type_name(other)),
            ));
            String::new()
        }
    }
}

fn updated_at_field(
    document: &Map<String, Value>,
    errors: &mut Vec<ValidationError>,
) -> Option<DateTime<Utc>> {
    match document.get("updatedAt") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => match DateTime::parse_from_rfc3339(text) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!("Ignoring unparseable updatedAt '{}': {}", text, e);
                None
            }
        },
        Some(Value::Number(number)) => number.as_f64().and_then(epoch_to_datetime),
        Some(other) => {
            errors.push(ValidationError::new(
                "updatedAt",
                format!(
                    "expected a timestamp string or epoch number, got {}",
                    json_type_name(other)
                ),
            ));
            None
        }
    }
}

fn epoch_to_datetime(epoch: f64) -> Option<DateTime<Utc>> {
    let millis = if epoch.abs() > EPOCH_MILLIS_THRESHOLD {
        epoch
    } else {
        epoch * 1000.0
    };
    Utc.timestamp_millis_opt(millis as i64).single()
}

/// Validate one tool entry, collecting every reason it is unusable
fn validate_tool(raw: &Value) -> Result<ToolSpec, Vec<String>> {
    let Some(entry) = raw.as_object() else {
        return Err(vec![format!(
            "tool entry must be a mapping, got {}",
            json_type_name(raw)
        )]);
    };

    let mut reasons = Vec::new();

    let id = required_text(entry, "id", &mut reasons);

    let name = required_text(entry, "name", &mut reasons);
    if !name.is_empty() {
        if !is_valid_tool_name(&name) {
            reasons.push(format!(
                "name '{}' must match ^[a-z][a-z0-9_]*$",
                name
            ));
        } else if is_reserved_tool_name(&name) {
            reasons.push(format!("name '{}' is reserved for a built-in tool", name));
        }
    }

    let description = required_text(entry, "description", &mut reasons);

    let request_type = match entry.get("requestType").and_then(Value::as_str) {
        Some(raw_type) => match raw_type.parse::<RequestType>() {
            Ok(request_type) => Some(request_type),
            Err(e) => {
                reasons.push(e);
                None
            }
        },
        None => {
            reasons.push("requestType is required".to_string());
            None
        }
    };

    let request_url = required_text(entry, "requestUrl", &mut reasons);
    if !request_url.is_empty() {
        if let Err(reason) = check_request_url(&request_url) {
            reasons.push(reason);
        }
    }

    let parameters = match entry.get("parameters") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => validate_parameters(items, &mut reasons),
        Some(other) => {
            reasons.push(format!(
                "parameters must be a sequence, got {}",
                json_type_name(other)
            ));
            Vec::new()
        }
    };

    let enabled = match entry.get("enabled") {
        None | Some(Value::Null) => true,
        Some(Value::Bool(enabled)) => *enabled,
        Some(other) => {
            reasons.push(format!(
                "enabled must be a boolean, got {}",
                json_type_name(other)
            ));
            false
        }
    };

    match request_type {
        Some(request_type) if reasons.is_empty() => Ok(ToolSpec {
            id,
            name,
            description,
            request_type,
            request_url,
            parameters,
            enabled,
        }),
        _ => Err(reasons),
    }
}

fn check_request_url(raw: &str) -> Result<(), String> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| format!("requestUrl '{}' is not a valid absolute URL: {}", raw, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!(
            "requestUrl '{}' must use http or https, not {}",
            raw, scheme
        )),
    }
}

fn validate_parameters(items: &[Value], reasons: &mut Vec<String>) -> Vec<ParameterSpec> {
    let mut parameters = Vec::new();
    let mut seen = HashSet::new();

    for (index, item) in items.iter().enumerate() {
        let Some(entry) = item.as_object() else {
            reasons.push(format!("parameter #{} must be a mapping", index));
            continue;
        };

        let name = entry
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if name.trim().is_empty() {
            reasons.push(format!("parameter #{} has no name", index));
            continue;
        }
        if !seen.insert(name.clone()) {
            reasons.push(format!("duplicate parameter name '{}'", name));
            continue;
        }

        let param_type = match entry.get("type").and_then(Value::as_str) {
            Some(raw_type) => match raw_type.parse::<ParameterType>() {
                Ok(param_type) => param_type,
                Err(e) => {
                    reasons.push(format!("parameter '{}': {}", name, e));
                    continue;
                }
            },
            None => {
                reasons.push(format!("parameter '{}' has no type", name));
                continue;
            }
        };

        let required = match entry.get("required") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(required)) => *required,
            Some(other) => {
                reasons.push(format!(
                    "parameter '{}': required must be a boolean, got {}",
                    name,
                    json_type_name(other)
                ));
                continue;
            }
        };

        let default_value = match entry.get("defaultValue") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) if text.trim().is_empty() => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            Some(other) => {
                reasons.push(format!(
                    "parameter '{}': defaultValue must be a string, got {}",
                    name,
                    json_type_name(other)
                ));
                continue;
            }
        };

        if let Some(default) = &default_value {
            if coerce_text(param_type, default).is_none() {
                reasons.push(format!(
                    "parameter '{}': default '{}' is not a valid {}",
                    name, default, param_type
                ));
                continue;
            }
        }

        let description = entry
            .get("description")
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string);

        parameters.push(ParameterSpec {
            name,
            param_type,
            required,
            default_value,
            description,
        });
    }

    parameters
}

fn required_text(entry: &Map<String, Value>, field: &str, reasons: &mut Vec<String>) -> String {
    match entry.get(field) {
        Some(Value::String(text)) if !text.trim().is_empty() => text.clone(),
        Some(Value::String(_)) | None | Some(Value::Null) => {
            reasons.push(format!("{} must not be empty", field));
            String::new()
        }
        Some(other) => {
            reasons.push(format!(
                "{} must be a string, got {}",
                field,
                json_type_name(other)
            ));
            String::new()
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
