//! Built-in configuration profiles and the registry that names them.
//!
//! # Design
//! - A profile is a pair of pure `fn` pointers over [`ConfigDocument`]; nothing
//!   is captured, so transforms can be exercised without any store.
//! - Each profile declares the fields it owns. The engine rejects results that
//!   change anything outside that set.
//! - `default-networking` and `default-power` restore defaults and carry no
//!   revert transform of their own.

use serde_json::{Value, json};

use crate::defaults::{
    DEFAULT_API_ADDRESS, DEFAULT_BOOTSTRAP, DEFAULT_CONN_MGR_HIGH_WATER,
    DEFAULT_CONN_MGR_LOW_WATER, DEFAULT_GATEWAY_ADDRESS, DEFAULT_MDNS_ENABLED,
    DEFAULT_SWARM_ADDRESSES, DEFAULT_WEBRTC_STAR_ENABLED, EPHEMERAL_LOOPBACK_ADDRESS,
    LOW_POWER_HIGH_WATER, LOW_POWER_LOW_WATER, string_list,
};
use crate::error::{ConfigError, ConfigResult};
use crate::model::ConfigDocument;
use crate::validate::path_within;

/// Pure document-to-document transform.
pub type Transform = fn(&ConfigDocument) -> ConfigResult<ConfigDocument>;

/// MDNS discovery toggle path.
pub const MDNS_ENABLED: &str = "Discovery.MDNS.Enabled";
/// webRTCStar discovery toggle path.
pub const WEBRTC_STAR_ENABLED: &str = "Discovery.webRTCStar.Enabled";
/// API address path.
pub const API_ADDRESS: &str = "Addresses.API";
/// Gateway address path.
pub const GATEWAY_ADDRESS: &str = "Addresses.Gateway";
/// Swarm listen addresses path.
pub const SWARM_ADDRESSES: &str = "Addresses.Swarm";
/// Bootstrap peer list path.
pub const BOOTSTRAP: &str = "Bootstrap";
/// Connection manager low watermark path.
pub const CONN_MGR_LOW_WATER: &str = "Swarm.ConnMgr.LowWater";
/// Connection manager high watermark path.
pub const CONN_MGR_HIGH_WATER: &str = "Swarm.ConnMgr.HighWater";

const DISCOVERY_FIELDS: &[&str] = &[MDNS_ENABLED, WEBRTC_STAR_ENABLED];
const NETWORKING_FIELDS: &[&str] = &[
    API_ADDRESS,
    GATEWAY_ADDRESS,
    SWARM_ADDRESSES,
    BOOTSTRAP,
    MDNS_ENABLED,
    WEBRTC_STAR_ENABLED,
];
const POWER_FIELDS: &[&str] = &[CONN_MGR_LOW_WATER, CONN_MGR_HIGH_WATER];

/// Named transform pair over the configuration document.
#[derive(Debug, Clone, Copy)]
pub struct Profile {
    /// Unique profile name used on the command line.
    pub name: &'static str,
    /// One-line description shown by `config profile ls`.
    pub description: &'static str,
    /// Paths the profile is allowed to change.
    pub fields: &'static [&'static str],
    /// Name of the profile that undoes this one, when there is one.
    pub inverse: Option<&'static str>,
    /// Forward transform.
    pub apply: Transform,
    /// Backward transform; `None` for default restorers.
    pub revert: Option<Transform>,
}

impl Profile {
    /// Whether `path` lies inside the profile's declared field set.
    #[must_use]
    pub fn owns(&self, path: &str) -> bool {
        self.fields.iter().any(|field| path_within(path, field))
    }

    /// Whether the profile has its own revert transform.
    #[must_use]
    pub const fn is_reversible(&self) -> bool {
        self.revert.is_some()
    }
}

/// Fixed catalogue of profiles keyed by name.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: Vec<Profile>,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileRegistry {
    /// Registry over an explicit profile list.
    #[must_use]
    pub const fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }

    /// Registry containing the built-in node profiles.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            Profile {
                name: "server",
                description: "Disables local host discovery, recommended when running in data centers.",
                fields: DISCOVERY_FIELDS,
                inverse: Some("local-discovery"),
                apply: disable_discovery,
                revert: Some(enable_discovery),
            },
            Profile {
                name: "local-discovery",
                description: "Enables local host discovery, inverse of the server profile.",
                fields: DISCOVERY_FIELDS,
                inverse: Some("server"),
                apply: enable_discovery,
                revert: Some(disable_discovery),
            },
            Profile {
                name: "test",
                description: "Reduces external interference, useful for running nodes in tests.",
                fields: NETWORKING_FIELDS,
                inverse: Some("default-networking"),
                apply: isolate_networking,
                revert: Some(restore_networking),
            },
            Profile {
                name: "default-networking",
                description: "Restores default network settings, inverse of the test profile.",
                fields: NETWORKING_FIELDS,
                inverse: Some("test"),
                apply: restore_networking,
                revert: None,
            },
            Profile {
                name: "lowpower",
                description: "Reduces daemon overhead on the system by lowering connection limits.",
                fields: POWER_FIELDS,
                inverse: Some("default-power"),
                apply: lower_power,
                revert: Some(restore_power),
            },
            Profile {
                name: "default-power",
                description: "Restores default connection limits, inverse of the lowpower profile.",
                fields: POWER_FIELDS,
                inverse: Some("lowpower"),
                apply: restore_power,
                revert: None,
            },
        ])
    }

    /// Look up a profile by name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownProfile` when no profile has that name.
    pub fn get(&self, name: &str) -> ConfigResult<&Profile> {
        self.profiles
            .iter()
            .find(|profile| profile.name == name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                name: name.to_string(),
            })
    }

    /// Iterate over registered profiles in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    /// Names of registered profiles in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.profiles.iter().map(|profile| profile.name).collect()
    }
}

fn with_fields(
    document: &ConfigDocument,
    fields: Vec<(&'static str, Value)>,
) -> ConfigResult<ConfigDocument> {
    let mut next = document.clone();
    for (path, value) in fields {
        next.set_preserving_type(path, value)?;
    }
    Ok(next)
}

fn set_discovery(document: &ConfigDocument, enabled: bool) -> ConfigResult<ConfigDocument> {
    with_fields(
        document,
        vec![
            (MDNS_ENABLED, json!(enabled)),
            (WEBRTC_STAR_ENABLED, json!(enabled)),
        ],
    )
}

fn disable_discovery(document: &ConfigDocument) -> ConfigResult<ConfigDocument> {
    set_discovery(document, false)
}

fn enable_discovery(document: &ConfigDocument) -> ConfigResult<ConfigDocument> {
    set_discovery(document, true)
}

fn isolate_networking(document: &ConfigDocument) -> ConfigResult<ConfigDocument> {
    with_fields(
        document,
        vec![
            (API_ADDRESS, json!(EPHEMERAL_LOOPBACK_ADDRESS)),
            (GATEWAY_ADDRESS, json!(EPHEMERAL_LOOPBACK_ADDRESS)),
            (SWARM_ADDRESSES, json!([EPHEMERAL_LOOPBACK_ADDRESS])),
            (BOOTSTRAP, json!([])),
            (MDNS_ENABLED, json!(false)),
            (WEBRTC_STAR_ENABLED, json!(false)),
        ],
    )
}

fn restore_networking(document: &ConfigDocument) -> ConfigResult<ConfigDocument> {
    with_fields(
        document,
        vec![
            (API_ADDRESS, json!(DEFAULT_API_ADDRESS)),
            (GATEWAY_ADDRESS, json!(DEFAULT_GATEWAY_ADDRESS)),
            (SWARM_ADDRESSES, string_list(DEFAULT_SWARM_ADDRESSES)),
            (BOOTSTRAP, string_list(DEFAULT_BOOTSTRAP)),
            (MDNS_ENABLED, json!(DEFAULT_MDNS_ENABLED)),
            (WEBRTC_STAR_ENABLED, json!(DEFAULT_WEBRTC_STAR_ENABLED)),
        ],
    )
}

fn lower_power(document: &ConfigDocument) -> ConfigResult<ConfigDocument> {
    with_fields(
        document,
        vec![
            (CONN_MGR_LOW_WATER, json!(LOW_POWER_LOW_WATER)),
            (CONN_MGR_HIGH_WATER, json!(LOW_POWER_HIGH_WATER)),
        ],
    )
}

fn restore_power(document: &ConfigDocument) -> ConfigResult<ConfigDocument> {
    with_fields(
        document,
        vec![
            (CONN_MGR_LOW_WATER, json!(DEFAULT_CONN_MGR_LOW_WATER)),
            (CONN_MGR_HIGH_WATER, json!(DEFAULT_CONN_MGR_HIGH_WATER)),
        ],
    )
}
