#![cfg(test)]
//! An in-memory BIG-IP and a canned resolver.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use f5export_core::device::{Device, DeviceError};
use f5export_core::resolver::{LookupError, NameResolver};
use f5export_protocols::icontrol::Payload;
use serde_json::{Value, json};

/// Device that serves JSON bodies by path and records every request.
#[derive(Default)]
pub struct FakeBigIp {
    objects: HashMap<String, Value>,
    broken: HashSet<String>,
    virtuals: Vec<Value>,
    pub requests: RefCell<Vec<String>>,
}

impl FakeBigIp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a virtual server. `pool` attaches a default pool by full path.
    pub fn virtual_server(mut self, full_path: &str, destination: &str, pool: Option<&str>) -> Self {
        let mut vs = json!({
            "kind": "tm:ltm:virtual:virtualstate",
            "fullPath": full_path,
            "destination": destination,
        });
        if let Some(pool) = pool {
            vs["pool"] = json!(pool);
            vs["poolReference"] = json!({
                "link": format!("https://localhost{}?ver=16.1.0", pool_path(pool))
            });
        }
        self.virtuals.push(vs);
        self
    }

    /// Adds a listing item exactly as given, well-formed or not.
    pub fn raw_virtual_server(mut self, item: Value) -> Self {
        self.virtuals.push(item);
        self
    }

    pub fn pool(mut self, full_path: &str, addresses: &[&str]) -> Self {
        let path = pool_path(full_path);
        let members_path = format!("{path}/members");
        self.objects.insert(
            path,
            json!({
                "kind": "tm:ltm:pool:poolstate",
                "fullPath": full_path,
                "membersReference": {
                    "link": format!("https://localhost{members_path}?ver=16.1.0")
                }
            }),
        );
        let items: Vec<Value> = addresses
            .iter()
            .map(|address| json!({ "name": format!("{address}:80"), "address": address }))
            .collect();
        self.objects.insert(
            members_path,
            json!({ "kind": "tm:ltm:pool:members:memberscollectionstate", "items": items }),
        );
        self
    }

    /// Makes the member collection of `full_path` answer with HTTP 500.
    pub fn break_members(mut self, full_path: &str) -> Self {
        self.broken.insert(format!("{}/members", pool_path(full_path)));
        self
    }

    pub fn break_listing(mut self) -> Self {
        self.broken.insert("/mgmt/tm/ltm/virtual".to_string());
        self
    }
}

impl Device for FakeBigIp {
    fn fetch(&self, path: &str) -> Result<Payload, DeviceError> {
        self.requests.borrow_mut().push(path.to_string());
        if self.broken.contains(path) {
            return Err(DeviceError::Status {
                path: path.to_string(),
                status: 500,
            });
        }
        if path == "/mgmt/tm/ltm/virtual" {
            return Ok(Payload::from_json(json!({
                "kind": "tm:ltm:virtual:virtualcollectionstate",
                "items": self.virtuals,
            })));
        }
        self.objects
            .get(path)
            .cloned()
            .map(Payload::from_json)
            .ok_or_else(|| DeviceError::Status {
                path: path.to_string(),
                status: 404,
            })
    }
}

fn pool_path(full_path: &str) -> String {
    format!("/mgmt/tm/ltm/pool/{}", full_path.replace('/', "~"))
}

/// Resolver answering from a fixed table; everything else has no record.
#[derive(Default)]
pub struct FakeDns {
    names: HashMap<String, String>,
}

impl FakeDns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ptr(mut self, address: &str, name: &str) -> Self {
        self.names.insert(address.to_string(), name.to_string());
        self
    }
}

impl NameResolver for FakeDns {
    fn lookup(&self, address: &str) -> Result<String, LookupError> {
        self.names
            .get(address)
            .cloned()
            .ok_or_else(|| LookupError::NoRecord(address.to_string()))
    }
}
