//! Key-level read/write access to the stored configuration.
//!
//! # Design
//! - Sensitive paths are neither readable nor writable through single-key access.
//! - Reading an ancestor of a sensitive path returns the subtree redacted;
//!   writing one is refused so the secret underneath cannot be replaced or dropped.
//! - `show` and `replace` are symmetric: a redacted document can be edited and
//!   handed back without wiping the secrets it no longer contains.

use serde_json::Value;
use tracing::{info, instrument};

use crate::error::{ConfigError, ConfigResult};
use crate::model::{ConfigDocument, ConfigValue};
use crate::redact::Redactor;
use crate::store::ConfigStore;

/// Facade over a [`ConfigStore`] used by the `config` command family.
#[derive(Debug)]
pub struct ConfigService<S> {
    store: S,
    redactor: Redactor,
}

impl<S: ConfigStore> ConfigService<S> {
    /// Service using the default redaction rules.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_redactor(store, Redactor::default())
    }

    /// Service using explicit redaction rules.
    #[must_use]
    pub const fn with_redactor(store: S, redactor: Redactor) -> Self {
        Self { store, redactor }
    }

    /// Redactor applied to every document this service hands out.
    #[must_use]
    pub const fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    /// Underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Read the value stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns `SensitivePath`, `InvalidPath`, `PathNotFound`, or store failures.
    pub async fn get_key(&self, key: &str) -> ConfigResult<Value> {
        self.guard(key)?;
        let value = self.store.get_path(key).await?;
        Ok(self.redactor.redact_value(key, &value))
    }

    /// Write `value` at `key` and persist the document.
    ///
    /// # Errors
    ///
    /// Returns `SensitivePath` (also for ancestors of sensitive paths), `InvalidPath`,
    /// `MalformedDocument`, or store failures.
    #[instrument(name = "config.set_key", skip(self, value))]
    pub async fn set_key(&self, key: &str, value: ConfigValue) -> ConfigResult<()> {
        self.guard(key)?;
        if self.redactor.covers_descendant(key) {
            return Err(ConfigError::SensitivePath {
                path: key.to_string(),
            });
        }
        self.store.set_path(key, value.into_json()).await?;
        info!("configuration key updated");
        Ok(())
    }

    /// Full document with sensitive fields removed.
    ///
    /// # Errors
    ///
    /// Returns store failures.
    pub async fn show(&self) -> ConfigResult<ConfigDocument> {
        let document = self.store.get().await?;
        Ok(self.redactor.redact(&document))
    }

    /// Replace the whole document, keeping current secrets the replacement omits.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` when a secret cannot be carried over, or store failures.
    #[instrument(name = "config.replace", skip(self, replacement))]
    pub async fn replace(&self, replacement: ConfigDocument) -> ConfigResult<ConfigDocument> {
        let current = self.store.get().await?;
        let mut next = replacement;
        let mut carried = 0_usize;
        for (path, value) in self.sensitive_entries(&current) {
            if next.get(&path)?.is_none() {
                next.set(&path, value)?;
                carried += 1;
            }
        }
        self.store.set(&next).await?;
        info!(carried, "configuration replaced");
        Ok(next)
    }

    fn guard(&self, key: &str) -> ConfigResult<()> {
        if self.redactor.is_sensitive(key) {
            return Err(ConfigError::SensitivePath {
                path: key.to_string(),
            });
        }
        Ok(())
    }

    fn sensitive_entries(&self, document: &ConfigDocument) -> Vec<(String, Value)> {
        let mut entries = Vec::new();
        collect_sensitive(&self.redactor, "", document.as_map(), &mut entries);
        entries
    }
}

fn collect_sensitive(
    redactor: &Redactor,
    prefix: &str,
    map: &serde_json::Map<String, Value>,
    out: &mut Vec<(String, Value)>,
) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        if redactor.is_sensitive(&path) {
            out.push((path, value.clone()));
        } else if let Value::Object(child) = value {
            collect_sensitive(redactor, &path, child, out);
        }
    }
}
