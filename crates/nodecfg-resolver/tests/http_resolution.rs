use anyhow::{Result, anyhow};
use httpmock::prelude::*;
use nodecfg_resolver::{
    AddressResolver, HttpDnsLookup, LookupError, ResolveError, ResolveOptions,
};
use reqwest::Client;
use serde_json::json;

fn resolver_for(server: &MockServer) -> Result<AddressResolver<HttpDnsLookup>> {
    let base_url = server
        .base_url()
        .parse()
        .map_err(|_| anyhow!("valid URL"))?;
    Ok(AddressResolver::new(HttpDnsLookup::new(Client::new(), base_url)))
}

#[tokio::test]
async fn recursive_resolution_walks_node_api() -> Result<()> {
    let server = MockServer::start_async().await;
    let first = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v0/dns")
            .query_param("arg", "/dnsaddr/bootstrap.libp2p.io");
        then.status(200)
            .json_body(json!({ "Path": "/dnsaddr/sjc-1.bootstrap.libp2p.io" }));
    });
    let second = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v0/dns")
            .query_param("arg", "/dnsaddr/sjc-1.bootstrap.libp2p.io");
        then.status(200)
            .json_body(json!({ "Path": "/ip4/147.75.83.83/tcp/4001" }));
    });

    let resolved = resolver_for(&server)?
        .resolve("/dnsaddr/bootstrap.libp2p.io", ResolveOptions::default())
        .await?;
    first.assert();
    second.assert();
    assert_eq!(resolved, "/ip4/147.75.83.83/tcp/4001");
    Ok(())
}

#[tokio::test]
async fn plain_address_never_calls_node() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/v0/dns");
        then.status(200).json_body(json!({ "Path": "/ip4/1.1.1.1/tcp/1" }));
    });

    let resolved = resolver_for(&server)?
        .resolve("/ip4/127.0.0.1/tcp/4001", ResolveOptions::default())
        .await?;
    assert_eq!(resolved, "/ip4/127.0.0.1/tcp/4001");
    mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn node_errors_become_resolution_failures() -> Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/v0/dns");
        then.status(500)
            .json_body(json!({ "Message": "lookup failed", "Code": 0, "Type": "error" }));
    });

    let err = resolver_for(&server)?
        .resolve("/dnsaddr/broken.example", ResolveOptions::default())
        .await
        .expect_err("node error");
    match err {
        ResolveError::ResolutionFailed { address, source } => {
            assert_eq!(address, "/dnsaddr/broken.example");
            assert!(matches!(source, LookupError::Rejected { status: 500, .. }));
        }
        other => return Err(anyhow!("unexpected error: {other:?}")),
    }
    Ok(())
}
