//! DNS-link lookup seam and its node HTTP API implementation.

use std::fmt::Display;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::LookupError;

const DNS_ENDPOINT: &str = "/api/v0/dns";

#[async_trait]
/// Performs one DNS-link lookup step.
pub trait DnsLinkLookup: Send + Sync {
    /// Resolve `address` one level, returning the address it points to.
    async fn lookup(&self, address: &str) -> Result<String, LookupError>;
}

#[derive(Deserialize)]
struct DnsResponse {
    #[serde(rename = "Path")]
    path: String,
}

#[derive(Deserialize)]
struct ApiMessage {
    #[serde(rename = "Message")]
    message: String,
}

/// Lookup through a running node's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpDnsLookup {
    client: Client,
    base_url: Url,
}

impl HttpDnsLookup {
    /// Lookup client for the node API rooted at `base_url`.
    #[must_use]
    pub const fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Base URL of the node API.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, address: &str) -> Result<Url, LookupError> {
        let mut url = self
            .base_url
            .join(DNS_ENDPOINT)
            .map_err(|source| LookupError::Endpoint { source })?;
        url.query_pairs_mut()
            .append_pair("arg", address)
            .append_pair("recursive", "false");
        Ok(url)
    }
}

fn rejection_message<E: Display>(body: Result<String, E>) -> String {
    match body {
        Ok(body) => serde_json::from_str::<ApiMessage>(&body)
            .map_or_else(|_| body.trim().to_string(), |api| api.message),
        Err(err) => format!("<unreadable body: {err}>"),
    }
}

#[async_trait]
impl DnsLinkLookup for HttpDnsLookup {
    #[instrument(name = "dns.lookup", skip(self))]
    async fn lookup(&self, address: &str) -> Result<String, LookupError> {
        let url = self.endpoint(address)?;
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|source| LookupError::Request { source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Rejected {
                status: status.as_u16(),
                message: rejection_message(response.text().await),
            });
        }

        let payload = response
            .json::<DnsResponse>()
            .await
            .map_err(|source| LookupError::Decode { source })?;
        if payload.path.trim().is_empty() {
            return Err(LookupError::NotFound {
                name: address.to_string(),
            });
        }
        debug!(path = %payload.path, "lookup resolved");
        Ok(payload.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use httpmock::prelude::*;
    use serde_json::json;

    fn lookup_for(server: &MockServer) -> Result<HttpDnsLookup> {
        let base_url = server
            .base_url()
            .parse()
            .map_err(|_| anyhow!("valid URL"))?;
        Ok(HttpDnsLookup::new(Client::new(), base_url))
    }

    #[tokio::test]
    async fn lookup_posts_address_and_reads_path() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v0/dns")
                .query_param("arg", "/dnsaddr/bootstrap.libp2p.io");
            then.status(200)
                .json_body(json!({ "Path": "/ip4/147.75.83.83/tcp/4001" }));
        });

        let path = lookup_for(&server)?
            .lookup("/dnsaddr/bootstrap.libp2p.io")
            .await?;
        mock.assert();
        assert_eq!(path, "/ip4/147.75.83.83/tcp/4001");
        Ok(())
    }

    #[tokio::test]
    async fn lookup_surfaces_node_error_message() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/v0/dns");
            then.status(500).json_body(json!({
                "Message": "could not resolve name",
                "Code": 0,
                "Type": "error"
            }));
        });

        let err = lookup_for(&server)?
            .lookup("/dnsaddr/missing.example")
            .await
            .expect_err("node rejected lookup");
        match err {
            LookupError::Rejected { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "could not resolve name");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn rejection_message_prefers_node_message() {
        let body: Result<String, String> = Ok(r#"{"Message":"no link named"}"#.into());
        assert_eq!(rejection_message(body), "no link named");

        let raw: Result<String, String> = Ok("  gateway exploded \n".into());
        assert_eq!(rejection_message(raw), "gateway exploded");
    }

    #[test]
    fn rejection_message_records_unreadable_body() {
        let body: Result<String, String> = Err("connection reset".into());
        assert_eq!(
            rejection_message(body),
            "<unreadable body: connection reset>"
        );
    }

    #[tokio::test]
    async fn lookup_rejects_body_without_path() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/v0/dns");
            then.status(200).json_body(json!({ "Unexpected": true }));
        });

        let err = lookup_for(&server)?
            .lookup("/dnsaddr/odd.example")
            .await
            .expect_err("missing Path");
        assert!(matches!(err, LookupError::Decode { .. }));
        Ok(())
    }
}
