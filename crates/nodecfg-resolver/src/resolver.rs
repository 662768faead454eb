//! Recursive `dnsaddr` resolution with a hop cap and an overall deadline.
//!
//! # Design
//! - Addresses without a `dnsaddr` segment never reach the lookup.
//! - The deadline covers the whole chain; dropping the future on expiry cancels
//!   whichever lookup is in flight.

use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, instrument};

use crate::error::{ResolveError, ResolveResult};
use crate::lookup::DnsLinkLookup;

/// Upper bound on lookups performed for one recursive resolution.
pub const MAX_RESOLVE_HOPS: usize = 32;
/// Multiaddr protocol segment marking a DNS-link indirection.
pub const DNSADDR_PROTOCOL: &str = "dnsaddr";
/// Deadline applied when the caller does not choose one.
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(10);

/// Caller choices for a single resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Keep resolving until the result carries no `dnsaddr` segment.
    pub recursive: bool,
    /// Deadline for the whole resolution.
    pub timeout: Duration,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            timeout: DEFAULT_RESOLVE_TIMEOUT,
        }
    }
}

/// Whether `address` contains a `dnsaddr` protocol segment.
#[must_use]
pub fn has_dns_link(address: &str) -> bool {
    address.split('/').any(|segment| segment == DNSADDR_PROTOCOL)
}

/// Resolves DNS-link addresses through a [`DnsLinkLookup`].
#[derive(Debug, Clone)]
pub struct AddressResolver<L> {
    lookup: L,
    max_hops: usize,
}

impl<L: DnsLinkLookup> AddressResolver<L> {
    /// Resolver with the default hop cap.
    #[must_use]
    pub const fn new(lookup: L) -> Self {
        Self {
            lookup,
            max_hops: MAX_RESOLVE_HOPS,
        }
    }

    /// Override the hop cap.
    #[must_use]
    pub const fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Lookup used by this resolver.
    #[must_use]
    pub const fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Resolve `address` to a concrete address.
    ///
    /// # Errors
    ///
    /// Returns `ResolutionFailed` when a lookup fails, `HopLimitExceeded` when a
    /// recursive chain does not settle, and `ResolutionTimeout` when the deadline
    /// passes first.
    #[instrument(name = "address.resolve", skip(self, options), fields(recursive = options.recursive))]
    pub async fn resolve(&self, address: &str, options: ResolveOptions) -> ResolveResult<String> {
        if !has_dns_link(address) {
            return Ok(address.to_string());
        }
        timeout(options.timeout, self.chase(address, options.recursive))
            .await
            .unwrap_or_else(|_| {
                Err(ResolveError::ResolutionTimeout {
                    address: address.to_string(),
                    timeout: options.timeout,
                })
            })
    }

    async fn chase(&self, address: &str, recursive: bool) -> ResolveResult<String> {
        let mut current = address.to_string();
        for hop in 1..=self.max_hops {
            current = self.lookup.lookup(&current).await.map_err(|source| {
                ResolveError::ResolutionFailed {
                    address: address.to_string(),
                    source,
                }
            })?;
            debug!(hop, resolved = %current, "dns link followed");
            if !recursive || !has_dns_link(&current) {
                return Ok(current);
            }
        }
        Err(ResolveError::HopLimitExceeded {
            address: address.to_string(),
            hops: self.max_hops,
        })
    }
}
