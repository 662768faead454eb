//! Error types for DNS-link lookups and address resolution.
//!
//! # Design
//! - `LookupError` describes a single lookup; `ResolveError` wraps it with the
//!   address the caller asked for so the original input is never lost.

use std::time::Duration;

use thiserror::Error;

/// Failure of a single DNS-link lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Node API URL could not be built.
    #[error("invalid node API endpoint")]
    Endpoint {
        /// Underlying URL error.
        #[source]
        source: url::ParseError,
    },
    /// Request could not be sent or the connection failed.
    #[error("request to node API failed")]
    Request {
        /// Underlying HTTP error.
        #[source]
        source: reqwest::Error,
    },
    /// Node API answered with an error message.
    #[error("node API rejected lookup (status {status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message reported by the node, or the raw body.
        message: String,
    },
    /// Response body did not contain a resolved path.
    #[error("node API returned an unreadable response")]
    Decode {
        /// Underlying decode error.
        #[source]
        source: reqwest::Error,
    },
    /// Lookup found no record for the name.
    #[error("no DNS link record for '{name}'")]
    NotFound {
        /// Name that was looked up.
        name: String,
    },
}

/// Failure to resolve an address.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Recursive resolution did not terminate within the hop cap.
    #[error("resolution of '{address}' exceeded {hops} hops")]
    HopLimitExceeded {
        /// Address supplied by the caller.
        address: String,
        /// Hop cap that was hit.
        hops: usize,
    },
    /// A lookup in the chain failed.
    #[error("failed to resolve '{address}'")]
    ResolutionFailed {
        /// Address supplied by the caller.
        address: String,
        /// Lookup failure.
        #[source]
        source: LookupError,
    },
    /// Resolution did not finish before the deadline.
    #[error("resolution of '{address}' timed out after {timeout:?}")]
    ResolutionTimeout {
        /// Address supplied by the caller.
        address: String,
        /// Deadline that elapsed.
        timeout: Duration,
    },
}

impl ResolveError {
    /// Address the caller asked to resolve.
    #[must_use]
    pub fn address(&self) -> &str {
        match self {
            Self::HopLimitExceeded { address, .. }
            | Self::ResolutionFailed { address, .. }
            | Self::ResolutionTimeout { address, .. } => address,
        }
    }
}

/// Convenience alias for resolution results.
pub type ResolveResult<T> = Result<T, ResolveError>;
