//! # LTM Object Model
//!
//! The slice of the BIG-IP Local Traffic Manager configuration that the export
//! walks: virtual servers, their default pool and the pool's members.
//!
//! Field names follow the iControl REST JSON (`camelCase`). Everything not
//! listed here is ignored when decoding.

use serde::{Deserialize, Serialize};

/// A link to a related object or collection, e.g. `poolReference`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub link: String,
}

/// A load-balancer listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualServer {
    /// Partition-qualified name, e.g. `/Common/vs_web`. Unique per device.
    pub full_path: String,
    /// Address and port as one string, e.g. `/Common/10.1.1.1:80`.
    #[serde(default)]
    pub destination: String,
    /// Full path of the default pool, when one is attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_reference: Option<Reference>,
    /// Present when the listener addresses come from an address list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_matching_criteria_reference: Option<Reference>,
}

impl VirtualServer {
    pub fn uses_address_list(&self) -> bool {
        self.traffic_matching_criteria_reference.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub full_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members_reference: Option<Reference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMember {
    /// `<node>:<port>` as shown in the GUI.
    #[serde(default)]
    pub name: String,
    /// IPv4 or IPv6 text form, possibly with a `%<route-domain>` suffix.
    pub address: String,
}
