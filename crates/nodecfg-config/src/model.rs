//! Typed configuration models and change payloads.
//!
//! # Design
//! - `ConfigDocument` is the only shape the engine sees: a JSON object root
//!   addressed with dotted key paths.
//! - `ConfigValue` carries the caller's type decision (`--bool`, `--json`)
//!   across the CLI boundary so coercion never happens inside the engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};
use crate::validate::{ensure_same_kind, parse_bool, parse_json, split_path};

/// Structured configuration document with an object root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Map<String, Value>);

impl ConfigDocument {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MalformedDocument` when the value is not an object.
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ConfigError::MalformedDocument {
                path: "<root>".to_string(),
                reason: "document root must be an object",
            }),
        }
    }

    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::StoreFormat` when the text is not JSON and
    /// `ConfigError::MalformedDocument` when the root is not an object.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|err| ConfigError::store_format("parse", err))?;
        Self::from_value(value)
    }

    /// Borrow the top-level object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Clone the document into a plain JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Consume the document into a plain JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Serialize the document as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::StoreFormat` if serialization fails.
    pub fn to_pretty_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(&self.0)
            .map_err(|err| ConfigError::store_format("serialize", err))
    }

    /// Look up the value stored at a dotted key path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPath` for empty path segments.
    pub fn get(&self, path: &str) -> ConfigResult<Option<&Value>> {
        let segments = split_path(path)?;
        let (last, parents) = split_last(&segments, path)?;
        let mut current = &self.0;
        for segment in parents {
            match current.get(*segment) {
                Some(Value::Object(child)) => current = child,
                _ => return Ok(None),
            }
        }
        Ok(current.get(*last))
    }

    /// Store a value at a dotted key path, creating missing parent objects.
    ///
    /// Returns the previous value, if any.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPath` for empty path segments and
    /// `ConfigError::MalformedDocument` when a parent segment holds a non-object.
    pub fn set(&mut self, path: &str, value: Value) -> ConfigResult<Option<Value>> {
        let segments = split_path(path)?;
        let parent = self.parent_mut(path, &segments)?;
        let (last, _) = split_last(&segments, path)?;
        Ok(parent.insert((*last).to_string(), value))
    }

    /// Store a value at a dotted key path without changing the field's JSON kind.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigDocument::set`], plus `ConfigError::FieldTypeMismatch` when
    /// an existing non-null value has a different kind.
    pub fn set_preserving_type(&mut self, path: &str, value: Value) -> ConfigResult<()> {
        ensure_same_kind(path, self.get(path)?, &value)?;
        self.set(path, value)?;
        Ok(())
    }

    /// Remove the value stored at a dotted key path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPath` for empty path segments.
    pub fn remove(&mut self, path: &str) -> ConfigResult<Option<Value>> {
        let segments = split_path(path)?;
        let (last, parents) = split_last(&segments, path)?;
        let mut current = &mut self.0;
        for segment in parents {
            match current.get_mut(*segment) {
                Some(Value::Object(child)) => current = child,
                _ => return Ok(None),
            }
        }
        Ok(current.remove(*last))
    }

    /// Leaf paths whose values differ between `self` and `other`, sorted.
    ///
    /// Objects are descended into; arrays and scalars compare as a whole.
    #[must_use]
    pub fn changed_paths(&self, other: &Self) -> Vec<String> {
        let mut changed = Vec::new();
        diff_maps("", &self.0, &other.0, &mut changed);
        changed.sort();
        changed
    }

    /// Project the document onto a set of paths (`None` where a path is absent).
    #[must_use]
    pub fn restricted_to(&self, paths: &[&str]) -> BTreeMap<String, Option<Value>> {
        paths
            .iter()
            .map(|path| {
                let value = self.get(path).ok().flatten().cloned();
                ((*path).to_string(), value)
            })
            .collect()
    }

    fn parent_mut(
        &mut self,
        path: &str,
        segments: &[&str],
    ) -> ConfigResult<&mut Map<String, Value>> {
        let (_, parents) = split_last(segments, path)?;
        let mut current = &mut self.0;
        let mut walked = String::new();
        for segment in parents {
            if !walked.is_empty() {
                walked.push('.');
            }
            walked.push_str(segment);
            let entry = current
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            match entry {
                Value::Object(child) => current = child,
                _ => {
                    return Err(ConfigError::MalformedDocument {
                        path: walked,
                        reason: "expected an object",
                    });
                }
            }
        }
        Ok(current)
    }
}

fn split_last<'a, 'b>(
    segments: &'b [&'a str],
    path: &str,
) -> ConfigResult<(&'b &'a str, &'b [&'a str])> {
    segments.split_last().ok_or_else(|| ConfigError::InvalidPath {
        path: path.to_string(),
    })
}

fn diff_maps(
    prefix: &str,
    left: &Map<String, Value>,
    right: &Map<String, Value>,
    out: &mut Vec<String>,
) {
    for (key, left_value) in left {
        let path = join_path(prefix, key);
        match (left_value, right.get(key)) {
            (Value::Object(l), Some(Value::Object(r))) => diff_maps(&path, l, r, out),
            (l, Some(r)) if l == r => {}
            _ => out.push(path),
        }
    }
    for key in right.keys() {
        if !left.contains_key(key) {
            out.push(join_path(prefix, key));
        }
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Type hint selected at the CLI boundary for a raw value argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueHint {
    /// Store the raw argument as a string.
    #[default]
    Plain,
    /// Parse the argument as `true` or `false`.
    Bool,
    /// Parse the argument as JSON text.
    Json,
}

/// Value decided at the boundary before it reaches a document.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// Plain string value.
    String(String),
    /// Boolean value from `--bool`.
    Bool(bool),
    /// Explicit JSON null.
    Null,
    /// Arbitrary JSON value from `--json`.
    Json(Value),
}

impl ConfigValue {
    /// Parse a raw argument according to its type hint.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MalformedValue` when the argument does not parse.
    pub fn parse(key: &str, raw: &str, hint: ValueHint) -> ConfigResult<Self> {
        match hint {
            ValueHint::Plain => Ok(Self::String(raw.to_string())),
            ValueHint::Bool => parse_bool(key, raw).map(Self::Bool),
            ValueHint::Json => match parse_json(key, raw)? {
                Value::Null => Ok(Self::Null),
                other => Ok(Self::Json(other)),
            },
        }
    }

    /// Convert into the JSON representation stored in documents.
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Self::String(text) => Value::String(text),
            Self::Bool(flag) => Value::Bool(flag),
            Self::Null => Value::Null,
            Self::Json(value) => value,
        }
    }
}

/// Options accepted by profile apply/revert operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Compute the result without persisting it.
    pub dry_run: bool,
}

impl ApplyOptions {
    /// Options for a preview that never writes.
    #[must_use]
    pub const fn dry_run() -> Self {
        Self { dry_run: true }
    }
}

/// Outcome of running a profile transform.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyResult {
    /// Document the transform started from.
    pub original: ConfigDocument,
    /// Document produced by the transform.
    pub updated: ConfigDocument,
    /// Whether `updated` was persisted to the store.
    pub applied: bool,
    /// Leaf paths that differ between `original` and `updated`.
    pub changed: Vec<String>,
}
