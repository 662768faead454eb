//! Error types for configuration operations.
//!
//! # Design
//! - One structured enum for every failure the document, store, profile and
//!   service layers can raise.
//! - Context (operation, path, profile) lives in fields so callers can map
//!   failures to exit codes without parsing messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Requested profile is not present in the registry.
    #[error("unknown profile '{name}'")]
    UnknownProfile {
        /// Name supplied by the caller.
        name: String,
    },
    /// Profile exists but only restores defaults and has no revert transform.
    #[error("profile '{name}' cannot be reverted")]
    ProfileNotReversible {
        /// Name supplied by the caller.
        name: String,
    },
    /// User supplied value failed to parse under the requested type hint.
    #[error("invalid {hint} value for '{key}': {reason}")]
    MalformedValue {
        /// Key the value was destined for.
        key: String,
        /// Type hint used for parsing (`bool`, `json`).
        hint: &'static str,
        /// Human-readable parse failure.
        reason: String,
    },
    /// Existing document does not have the shape a transform requires.
    #[error("malformed configuration at '{path}': {reason}")]
    MalformedDocument {
        /// Path where the document shape was violated.
        path: String,
        /// Static reason for the failure.
        reason: &'static str,
    },
    /// A write would change the JSON kind of an existing field.
    #[error("field '{path}' holds a {found} value; refusing to replace it with a {expected}")]
    FieldTypeMismatch {
        /// Path of the field.
        path: String,
        /// Kind of the value the write attempted to store.
        expected: &'static str,
        /// Kind currently stored at the path.
        found: &'static str,
    },
    /// Profile transform touched a field outside its declared scope.
    #[error("profile '{profile}' modified undeclared field '{path}'")]
    ScopeViolation {
        /// Profile whose transform misbehaved.
        profile: String,
        /// Undeclared path that changed.
        path: String,
    },
    /// Key path was empty or contained empty segments.
    #[error("invalid configuration key '{path}'")]
    InvalidPath {
        /// Offending key path.
        path: String,
    },
    /// Key path does not exist in the document.
    #[error("configuration key '{path}' does not exist")]
    PathNotFound {
        /// Missing key path.
        path: String,
    },
    /// Key path is covered by the sensitive field set.
    #[error("configuration key '{path}' is sensitive and cannot be read or written here")]
    SensitivePath {
        /// Sensitive key path.
        path: String,
    },
    /// Persisted document could not be read or written.
    #[error("config store {operation} failed for {}", path.display())]
    StoreIo {
        /// Operation identifier.
        operation: &'static str,
        /// File involved in the failure.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// Persisted document (or a replacement file) is not valid JSON.
    #[error("config store {operation} failed: document is not valid JSON")]
    StoreFormat {
        /// Operation identifier.
        operation: &'static str,
        /// Source JSON error.
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub(crate) fn store_io(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        Self::StoreIo {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn store_format(operation: &'static str, source: serde_json::Error) -> Self {
        Self::StoreFormat { operation, source }
    }

    /// Whether the failure originated in the persistence layer.
    #[must_use]
    pub const fn is_store_failure(&self) -> bool {
        matches!(self, Self::StoreIo { .. } | Self::StoreFormat { .. })
    }

    /// Whether the failure was caused by caller input rather than the environment.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownProfile { .. }
                | Self::ProfileNotReversible { .. }
                | Self::MalformedValue { .. }
                | Self::InvalidPath { .. }
                | Self::PathNotFound { .. }
                | Self::SensitivePath { .. }
        )
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
