//! Typed argument binding for configured tools
//!
//! Converts caller-supplied JSON arguments into values of the declared
//! parameter types, applying defaults and required-ness.

use crate::config::{ParameterSpec, ParameterType};
use crate::error::ToolError;
use serde_json::{Map, Number, Value};

/// Accepted spellings of `true` (case-insensitive)
pub const TRUTHY_TOKENS: &[&str] = &["true", "1", "yes", "on"];

/// Accepted spellings of `false` (case-insensitive)
pub const FALSY_TOKENS: &[&str] = &["false", "0", "no", "off"];

/// Parse a boolean token
pub fn parse_boolean(text: &str) -> Option<bool> {
    let token = text.trim().to_ascii_lowercase();
    if TRUTHY_TOKENS.contains(&token.as_str()) {
        Some(true)
    } else if FALSY_TOKENS.contains(&token.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Parse a finite number, preferring an integer representation
pub fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(integer) = text.parse::<i64>() {
        return Some(Number::from(integer));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Coerce textual input (a default value or a string argument) to `param_type`
pub fn coerce_text(param_type: ParameterType, text: &str) -> Option<Value> {
    match param_type {
        ParameterType::String => Some(Value::String(text.to_string())),
        ParameterType::Number => parse_number(text).map(Value::Number),
        ParameterType::Boolean => parse_boolean(text).map(Value::Bool),
    }
}

/// Coerce an arbitrary JSON value to `param_type`
///
/// Arrays and objects never coerce. `null` must be handled by the caller.
pub fn coerce_value(param_type: ParameterType, value: &Value) -> Option<Value> {
    match (param_type, value) {
        (_, Value::String(text)) => coerce_text(param_type, text),
        (ParameterType::String, Value::Number(n)) => Some(Value::String(n.to_string())),
        (ParameterType::String, Value::Bool(b)) => Some(Value::String(b.to_string())),
        (ParameterType::Number, Value::Number(n)) => Some(Value::Number(n.clone())),
        (ParameterType::Boolean, Value::Bool(b)) => Some(Value::Bool(*b)),
        (ParameterType::Boolean, Value::Number(n)) => parse_boolean(&n.to_string()).map(Value::Bool),
        _ => None,
    }
}

/// Arguments after binding, in parameter declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    entries: Vec<(String, Value)>,
}

impl BoundArguments {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Render as query-string pairs
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.clone(), render_query_value(value)))
            .collect()
    }

    /// Render as a JSON object body, keeping JSON types
    pub fn to_json_object(&self) -> Map<String, Value> {
        self.entries.iter().cloned().collect()
    }

    fn push(&mut self, name: &str, value: Value) {
        self.entries.push((name.to_string(), value));
    }
}

fn render_query_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Bind caller arguments against a parameter list
///
/// Fails before any I/O when a required parameter is missing or a value
/// cannot be coerced. `null` arguments count as omitted.
pub fn bind_arguments(
    parameters: &[ParameterSpec],
    arguments: &Value,
) -> Result<BoundArguments, ToolError> {
    let empty = Map::new();
    let supplied = match arguments {
        Value::Object(map) => map,
        Value::Null => &empty,
        other => {
            return Err(ToolError::InvalidArguments {
                message: format!("expected an object of named arguments, got {}", other),
            })
        }
    };

    let mut bound = BoundArguments::default();
    for parameter in parameters {
        match supplied.get(&parameter.name).filter(|value| !value.is_null()) {
            Some(value) => {
                let coerced = coerce_value(parameter.param_type, value).ok_or_else(|| {
                    ToolError::ParameterCoercion {
                        parameter: parameter.name.clone(),
                        value: value.to_string(),
                        expected: parameter.param_type.to_string(),
                    }
                })?;
                bound.push(&parameter.name, coerced);
            }
            None if parameter.required => {
                return Err(ToolError::MissingRequiredParameter {
                    parameter: parameter.name.clone(),
                });
            }
            None => {
                let Some(default) = parameter.default_value.as_deref() else {
                    continue;
                };
                let coerced = coerce_text(parameter.param_type, default).ok_or_else(|| {
                    ToolError::ParameterCoercion {
                        parameter: parameter.name.clone(),
                        value: Value::String(default.to_string()).to_string(),
                        expected: parameter.param_type.to_string(),
                    }
                })?;
                bound.push(&parameter.name, coerced);
            }
        }
    }

    for name in supplied.keys() {
        if !parameters.iter().any(|parameter| &parameter.name == name) {
            tracing::debug!("Ignoring undeclared argument '{}'", name);
        }
    }

    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn days() -> ParameterSpec {
        ParameterSpec::new("days", ParameterType::Number, false).with_default("3")
    }

    #[test]
    fn test_boolean_tokens() {
        for token in ["true", "TRUE", " yes ", "1", "On"] {
            assert_eq!(parse_boolean(token), Some(true), "token {:?}", token);
        }
        for token in ["false", "No", "0", "off"] {
            assert_eq!(parse_boolean(token), Some(false), "token {:?}", token);
        }
        assert_eq!(parse_boolean("maybe"), None);
        assert_eq!(parse_boolean(""), None);
    }

    #[test]
    fn test_number_parsing() {
        assert_eq!(parse_number("3"), Some(Number::from(3)));
        assert_eq!(parse_number(" -12 "), Some(Number::from(-12)));
        assert_eq!(parse_number("2.5").unwrap().to_string(), "2.5");
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_coerce_value_by_type() {
        assert_eq!(
            coerce_value(ParameterType::String, &json!(42)),
            Some(json!("42"))
        );
        assert_eq!(coerce_value(ParameterType::Number, &json!("5")), Some(json!(5)));
        assert_eq!(coerce_value(ParameterType::Number, &json!(true)), None);
        assert_eq!(
            coerce_value(ParameterType::Boolean, &json!("yes")),
            Some(json!(true))
        );
        assert_eq!(coerce_value(ParameterType::Boolean, &json!(0)), Some(json!(false)));
        assert_eq!(coerce_value(ParameterType::String, &json!(["a"])), None);
    }

    #[test]
    fn test_default_applied_when_omitted() {
        let bound = bind_arguments(&[days()], &json!({})).unwrap();
        assert_eq!(bound.get("days"), Some(&json!(3)));
        assert_eq!(
            bound.query_pairs(),
            vec![("days".to_string(), "3".to_string())]
        );
    }

    #[test]
    fn test_supplied_value_overrides_default() {
        let bound = bind_arguments(&[days()], &json!({"days": "5"})).unwrap();
        assert_eq!(bound.get("days"), Some(&json!(5)));
    }

    #[test]
    fn test_coercion_failure_names_parameter_and_value() {
        let err = bind_arguments(&[days()], &json!({"days": "abc"})).unwrap_err();
        match err {
            ToolError::ParameterCoercion {
                parameter, value, ..
            } => {
                assert_eq!(parameter, "days");
                assert_eq!(value, "\"abc\"");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_parameter() {
        let city = ParameterSpec::new("city", ParameterType::String, true);
        let err = bind_arguments(&[city.clone()], &json!({})).unwrap_err();
        assert!(matches!(
            err,
            ToolError::MissingRequiredParameter { ref parameter } if parameter == "city"
        ));

        // null counts as omitted
        let err = bind_arguments(&[city], &json!({"city": null})).unwrap_err();
        assert!(matches!(err, ToolError::MissingRequiredParameter { .. }));
    }

    #[test]
    fn test_optional_without_default_is_omitted() {
        let note = ParameterSpec::new("note", ParameterType::String, false);
        let bound = bind_arguments(&[note], &Value::Null).unwrap();
        assert!(bound.is_empty());
    }

    #[test]
    fn test_body_keeps_json_types_and_order() {
        let params = vec![
            ParameterSpec::new("title", ParameterType::String, true),
            ParameterSpec::new("urgent", ParameterType::Boolean, false).with_default("no"),
            ParameterSpec::new("count", ParameterType::Number, true),
        ];
        let bound = bind_arguments(
            &params,
            &json!({"count": 2, "title": "Call back", "extra": 1}),
        )
        .unwrap();
        assert_eq!(bound.len(), 3);
        assert_eq!(
            Value::Object(bound.to_json_object()),
            json!({"title": "Call back", "urgent": false, "count": 2})
        );
        assert_eq!(bound.query_pairs()[1].1, "false");
    }

    #[test]
    fn test_rejects_non_object_arguments() {
        let err = bind_arguments(&[], &json!("city=Paris")).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }
}
