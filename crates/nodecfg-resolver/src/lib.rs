#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Resolution of `dnsaddr` multiaddresses into concrete addresses.
//!
//! Layout: `error.rs` (lookup and resolution errors), `lookup.rs`
//! (`DnsLinkLookup` and the node HTTP API client), `resolver.rs`
//! (`AddressResolver` with hop cap and timeout).

pub mod error;
pub mod lookup;
pub mod resolver;

pub use error::{LookupError, ResolveError, ResolveResult};
pub use lookup::{DnsLinkLookup, HttpDnsLookup};
pub use resolver::{
    AddressResolver, DEFAULT_RESOLVE_TIMEOUT, DNSADDR_PROTOCOL, MAX_RESOLVE_HOPS, ResolveOptions,
    has_dns_link,
};
