//! Removal of secret-bearing fields before a document reaches any output sink.

use serde_json::{Map, Value};

use crate::model::ConfigDocument;
use crate::validate::path_within;

/// Path of the node's private key.
pub const PRIVATE_KEY_PATH: &str = "Identity.PrivKey";

/// Matching rule for a sensitive path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensitiveRule {
    /// Matches the path and everything below it.
    Exact(String),
    /// Matches like `Exact`, plus sibling keys whose name starts with the last segment.
    Prefix(String),
}

impl SensitiveRule {
    const fn path(&self) -> &str {
        match self {
            Self::Exact(rule) | Self::Prefix(rule) => rule.as_str(),
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(rule) => path_within(path, rule),
            Self::Prefix(rule) => {
                if path_within(path, rule) {
                    return true;
                }
                let (rule_parent, rule_leaf) = split_parent(rule);
                let mut remaining = path;
                if let Some(parent) = rule_parent {
                    let Some(rest) = path
                        .strip_prefix(parent)
                        .and_then(|rest| rest.strip_prefix('.'))
                    else {
                        return false;
                    };
                    remaining = rest;
                }
                remaining
                    .split('.')
                    .next()
                    .is_some_and(|key| key.starts_with(rule_leaf))
            }
        }
    }
}

fn split_parent(path: &str) -> (Option<&str>, &str) {
    path.rsplit_once('.')
        .map_or((None, path), |(parent, leaf)| (Some(parent), leaf))
}

/// Filter that strips sensitive fields from configuration snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redactor {
    rules: Vec<SensitiveRule>,
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(vec![SensitiveRule::Prefix(PRIVATE_KEY_PATH.to_string())])
    }
}

impl Redactor {
    /// Redactor over an explicit rule set.
    #[must_use]
    pub const fn new(rules: Vec<SensitiveRule>) -> Self {
        Self { rules }
    }

    /// Rules applied by this redactor.
    #[must_use]
    pub fn rules(&self) -> &[SensitiveRule] {
        &self.rules
    }

    /// Whether a dotted key path is covered by any rule.
    #[must_use]
    pub fn is_sensitive(&self, path: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(path))
    }

    /// Whether some sensitive path lies strictly below `path`.
    #[must_use]
    pub fn covers_descendant(&self, path: &str) -> bool {
        self.rules.iter().any(|rule| {
            let rule = rule.path();
            rule != path && path_within(rule, path)
        })
    }

    /// Copy of the subtree stored at `path` with sensitive descendants removed.
    #[must_use]
    pub fn redact_value(&self, path: &str, value: &Value) -> Value {
        let mut value = value.clone();
        if let Value::Object(map) = &mut value {
            self.strip(map, path);
        }
        value
    }

    /// Deep copy of `document` with every sensitive field removed.
    #[must_use]
    pub fn redact(&self, document: &ConfigDocument) -> ConfigDocument {
        let mut map = document.as_map().clone();
        self.strip(&mut map, "");
        ConfigDocument::from_value(Value::Object(map)).unwrap_or_default()
    }

    fn strip(&self, map: &mut Map<String, Value>, prefix: &str) {
        map.retain(|key, _| !self.is_sensitive(&join(prefix, key)));
        for (key, value) in map.iter_mut() {
            if let Value::Object(child) = value {
                self.strip(child, &join(prefix, key));
            }
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "CAASqAkwggSkAgEAAoIBAQC2SKo";

    fn identity_document() -> ConfigDocument {
        ConfigDocument::from_value(json!({
            "Identity": {
                "PeerID": "QmPeer",
                "PrivKey": SECRET,
                "PrivKeyBackup": { "Value": SECRET },
                "Unknown": "kept"
            },
            "Discovery": { "MDNS": { "Enabled": true } }
        }))
        .expect("object root")
    }

    #[test]
    fn default_rules_cover_private_key_family() {
        let redactor = Redactor::default();
        assert!(redactor.is_sensitive("Identity.PrivKey"));
        assert!(redactor.is_sensitive("Identity.PrivKey.Nested"));
        assert!(redactor.is_sensitive("Identity.PrivKeyBackup"));
        assert!(redactor.is_sensitive("Identity.PrivKeyBackup.Value"));
        assert!(!redactor.is_sensitive("Identity.PeerID"));
        assert!(!redactor.is_sensitive("Identity"));
        assert!(!redactor.is_sensitive("Other.PrivKey"));
    }

    #[test]
    fn ancestors_of_sensitive_paths_are_detected() {
        let redactor = Redactor::default();
        assert!(redactor.covers_descendant("Identity"));
        assert!(!redactor.covers_descendant("Identity.PrivKey"));
        assert!(!redactor.covers_descendant("Identity.PeerID"));
        assert!(!redactor.covers_descendant("Ident"));
        assert!(!redactor.covers_descendant("Discovery"));
    }

    #[test]
    fn redact_value_strips_subtree_relative_to_its_path() -> crate::ConfigResult<()> {
        let document = identity_document();
        let identity = document.get("Identity")?.cloned().unwrap_or_default();
        let redacted = Redactor::default().redact_value("Identity", &identity);
        let rendered = redacted.to_string();
        assert!(!rendered.contains(SECRET));
        assert!(!rendered.contains("PrivKey"));
        assert_eq!(redacted["PeerID"], json!("QmPeer"));
        assert_eq!(redacted["Unknown"], json!("kept"));

        let scalar = json!("QmPeer");
        assert_eq!(Redactor::default().redact_value("Identity.PeerID", &scalar), scalar);
        Ok(())
    }

    #[test]
    fn exact_rules_do_not_match_siblings() {
        let redactor = Redactor::new(vec![SensitiveRule::Exact("Api.Token".into())]);
        assert!(redactor.is_sensitive("Api.Token"));
        assert!(redactor.is_sensitive("Api.Token.Inner"));
        assert!(!redactor.is_sensitive("Api.TokenTtl"));
    }

    #[test]
    fn redact_removes_secret_values_from_serialized_output() -> crate::ConfigResult<()> {
        let document = identity_document();
        let redacted = Redactor::default().redact(&document);
        let rendered = redacted.to_pretty_json()?;
        assert!(!rendered.contains(SECRET));
        assert!(!rendered.contains("PrivKey"));
        assert_eq!(redacted.get("Identity.PeerID")?, Some(&json!("QmPeer")));
        assert_eq!(redacted.get("Identity.Unknown")?, Some(&json!("kept")));
        assert_eq!(redacted.get("Discovery.MDNS.Enabled")?, Some(&json!(true)));
        Ok(())
    }

    #[test]
    fn redact_leaves_input_untouched() -> crate::ConfigResult<()> {
        let document = identity_document();
        let _ = Redactor::default().redact(&document);
        assert_eq!(document.get("Identity.PrivKey")?, Some(&json!(SECRET)));
        Ok(())
    }

    #[test]
    fn redact_handles_top_level_rules() {
        let redactor = Redactor::new(vec![SensitiveRule::Prefix("Secret".into())]);
        let document = ConfigDocument::from_value(json!({
            "Secret": 1,
            "SecretToo": { "a": 2 },
            "Public": 3
        }))
        .expect("object root");
        let redacted = redactor.redact(&document);
        assert_eq!(redacted.as_map().len(), 1);
        assert!(redacted.as_map().contains_key("Public"));
    }
}
