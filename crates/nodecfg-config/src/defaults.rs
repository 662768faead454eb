//! Default node configuration values restored by the networking and power profiles.
//!
//! # Design
//! - Centralize defaults so profile transforms and fresh repositories agree.
//! - Keep loopback/ephemeral test values explicit next to the defaults they replace.

use serde_json::{Value, json};

use crate::model::ConfigDocument;

/// Default API listen address.
pub const DEFAULT_API_ADDRESS: &str = "/ip4/127.0.0.1/tcp/5002";
/// Default gateway listen address.
pub const DEFAULT_GATEWAY_ADDRESS: &str = "/ip4/127.0.0.1/tcp/9090";
/// Default swarm listen addresses.
pub const DEFAULT_SWARM_ADDRESSES: &[&str] =
    &["/ip4/0.0.0.0/tcp/4002", "/ip4/127.0.0.1/tcp/4003/ws"];
/// Default bootstrap peers.
pub const DEFAULT_BOOTSTRAP: &[&str] = &[
    "/ip4/104.236.176.52/tcp/4001/p2p/QmSoLnSGccFuZQJzRadHn95W2CrSFmZuTdDWP8HXaHca9z",
    "/ip4/104.131.131.82/tcp/4001/p2p/QmaCpDMGvV2BGHeYERUEnRQAwe3N8SzbUtfsmvsqQLuvuJ",
    "/ip4/104.236.179.241/tcp/4001/p2p/QmSoLPppuBtQSGwKDZT2M73ULpjvfd3aZ6ha4oFGL1KrGM",
    "/ip4/162.243.248.213/tcp/4001/p2p/QmSoLueR4xBeUbY9WZ9xGUUxunbKWcrNFTDAadQJmocnWm",
    "/ip4/128.199.219.111/tcp/4001/p2p/QmSoLSafTMBsPKadTEgaXctDQVcqN88CNLHXMkTNwMKPnu",
    "/ip4/104.236.76.40/tcp/4001/p2p/QmSoLV4Bbm51jM9C4gDYZQ9Cy3U6aXMJDAbzgu2fzaDs64",
    "/ip4/178.62.158.247/tcp/4001/p2p/QmSoLer265NRgSp2LA3dPaeykiS1J6DifTC88f5uVQKNAd",
    "/ip4/178.62.61.185/tcp/4001/p2p/QmSoLMeWqB7YGVLJN3pNLQpmmEk35v6wYtsMGLzSr5QBU3",
    "/ip4/104.236.151.122/tcp/4001/p2p/QmSoLju6m7xTh3DuokvT3886QRYqxAzb1kShaanJgW36yx",
    "/dnsaddr/bootstrap.libp2p.io/p2p/QmNnooDu7bfjPFoTZYxMNLWUQJyrVwtbZg5gBMjTezGAJN",
    "/dnsaddr/bootstrap.libp2p.io/p2p/QmbLHAnMoJPWSCR5Zhtx6BHJX9KiKNN6tpvbUcqanj75Nb",
    "/dnsaddr/bootstrap.libp2p.io/p2p/QmZa1sAxajnQjVM8WjWXoMbmPd7NsWhfKsPkErzpm9wGkp",
];
/// Default MDNS discovery toggle.
pub const DEFAULT_MDNS_ENABLED: bool = true;
/// Default MDNS announce interval in seconds.
pub const DEFAULT_MDNS_INTERVAL_SECS: u64 = 10;
/// Default webRTCStar discovery toggle.
pub const DEFAULT_WEBRTC_STAR_ENABLED: bool = true;
/// Default connection manager low watermark.
pub const DEFAULT_CONN_MGR_LOW_WATER: u64 = 200;
/// Default connection manager high watermark.
pub const DEFAULT_CONN_MGR_HIGH_WATER: u64 = 500;

/// Loopback address with an ephemeral port used by the `test` profile.
pub const EPHEMERAL_LOOPBACK_ADDRESS: &str = "/ip4/127.0.0.1/tcp/0";
/// Connection manager low watermark used by the `lowpower` profile.
pub const LOW_POWER_LOW_WATER: u64 = 20;
/// Connection manager high watermark used by the `lowpower` profile.
pub const LOW_POWER_HIGH_WATER: u64 = 40;

pub(crate) fn string_list(items: &[&str]) -> Value {
    Value::Array(items.iter().map(|item| json!(item)).collect())
}

/// Build the default node configuration without an identity section.
#[must_use]
pub fn default_document() -> ConfigDocument {
    let value = json!({
        "Addresses": {
            "Swarm": string_list(DEFAULT_SWARM_ADDRESSES),
            "API": DEFAULT_API_ADDRESS,
            "Gateway": DEFAULT_GATEWAY_ADDRESS
        },
        "Discovery": {
            "MDNS": {
                "Enabled": DEFAULT_MDNS_ENABLED,
                "Interval": DEFAULT_MDNS_INTERVAL_SECS
            },
            "webRTCStar": {
                "Enabled": DEFAULT_WEBRTC_STAR_ENABLED
            }
        },
        "Bootstrap": string_list(DEFAULT_BOOTSTRAP),
        "Pubsub": {
            "Router": "gossipsub",
            "Enabled": true
        },
        "Swarm": {
            "ConnMgr": {
                "LowWater": DEFAULT_CONN_MGR_LOW_WATER,
                "HighWater": DEFAULT_CONN_MGR_HIGH_WATER
            }
        }
    });
    ConfigDocument::from_value(value).unwrap_or_default()
}
