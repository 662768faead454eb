//! Validation helpers and parsing utilities for configuration documents.

use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};

/// Split a dotted key path into its segments, rejecting empty segments.
pub(crate) fn split_path(path: &str) -> ConfigResult<Vec<&str>> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.trim().is_empty()) {
        return Err(ConfigError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(segments)
}

/// Render the JSON kind of a value for diagnostics.
#[must_use]
pub(crate) const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reject writes that would change the JSON kind of an existing, non-null field.
pub(crate) fn ensure_same_kind(
    path: &str,
    current: Option<&Value>,
    next: &Value,
) -> ConfigResult<()> {
    let Some(current) = current else {
        return Ok(());
    };
    if current.is_null() || next.is_null() {
        return Ok(());
    }
    let found = value_kind(current);
    let expected = value_kind(next);
    if found == expected {
        Ok(())
    } else {
        Err(ConfigError::FieldTypeMismatch {
            path: path.to_string(),
            expected,
            found,
        })
    }
}

/// Parse a `--bool` argument; only the literal words `true` and `false` are accepted.
pub(crate) fn parse_bool(key: &str, raw: &str) -> ConfigResult<bool> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ConfigError::MalformedValue {
            key: key.to_string(),
            hint: "bool",
            reason: format!("expected 'true' or 'false', got '{other}'"),
        }),
    }
}

/// Parse a `--json` argument into a JSON value.
pub(crate) fn parse_json(key: &str, raw: &str) -> ConfigResult<Value> {
    serde_json::from_str(raw).map_err(|err| ConfigError::MalformedValue {
        key: key.to_string(),
        hint: "json",
        reason: err.to_string(),
    })
}

/// Whether `path` equals `scope` or lies underneath it.
#[must_use]
pub(crate) fn path_within(path: &str, scope: &str) -> bool {
    path == scope
        || path
            .strip_prefix(scope)
            .is_some_and(|rest| rest.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn split_path_rejects_empty_segments() {
        assert_eq!(
            split_path("Discovery.MDNS.Enabled").expect("valid path"),
            vec!["Discovery", "MDNS", "Enabled"]
        );
        for invalid in ["", ".", "a..b", ".a", "a.", "a. .b"] {
            let err = split_path(invalid).expect_err("path should be rejected");
            assert!(matches!(err, ConfigError::InvalidPath { .. }), "{invalid}");
        }
    }

    #[test]
    fn ensure_same_kind_allows_null_transitions() {
        assert!(ensure_same_kind("a", None, &json!(1)).is_ok());
        assert!(ensure_same_kind("a", Some(&Value::Null), &json!("x")).is_ok());
        assert!(ensure_same_kind("a", Some(&json!(true)), &Value::Null).is_ok());
        assert!(ensure_same_kind("a", Some(&json!(200)), &json!(20)).is_ok());
    }

    #[test]
    fn ensure_same_kind_rejects_kind_changes() {
        let err = ensure_same_kind("Bootstrap", Some(&json!([])), &json!("peer"))
            .expect_err("array to string must be rejected");
        match err {
            ConfigError::FieldTypeMismatch {
                path,
                expected,
                found,
            } => {
                assert_eq!(path, "Bootstrap");
                assert_eq!(expected, "string");
                assert_eq!(found, "array");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_bool_accepts_only_literals() {
        assert!(parse_bool("foo", "true").expect("true parses"));
        assert!(!parse_bool("foo", " false ").expect("false parses"));
        assert!(matches!(
            parse_bool("foo", "yes"),
            Err(ConfigError::MalformedValue { hint: "bool", .. })
        ));
    }

    #[test]
    fn parse_json_reports_malformed_input() {
        assert_eq!(
            parse_json("foo", r#"{"bar":0}"#).expect("valid json"),
            json!({"bar": 0})
        );
        let err = parse_json("foo", r#"{"bar:0}"#).expect_err("invalid json");
        assert!(err.to_string().contains("invalid json value for 'foo'"));
    }

    #[test]
    fn path_within_matches_descendants_only() {
        assert!(path_within("Discovery.MDNS.Enabled", "Discovery.MDNS.Enabled"));
        assert!(path_within("Addresses.Swarm.0", "Addresses.Swarm"));
        assert!(!path_within("Addresses.SwarmExtra", "Addresses.Swarm"));
        assert!(!path_within("Addresses", "Addresses.Swarm"));
    }
}
