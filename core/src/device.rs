//! # Device Facade
//!
//! The inventory walker only ever asks a device for "the thing at this path".
//! [`Device`] is that seam; [`BigIpClient`] implements it over iControl REST
//! and tests implement it over a map of canned JSON.
//!
//! Links handed out by the device are absolute URLs. The helpers here reduce
//! them to their path before dispatch so callers can pass either form.

use f5export_common::network::link;
use f5export_protocols::icontrol::{Payload, PayloadError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

mod bigip;

pub use bigip::BigIpClient;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("cannot connect to {host}: {reason}")]
    Connect { host: String, reason: String },
    #[error("request to {path} failed: {source}")]
    Http {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{path} returned HTTP {status}")]
    Status { path: String, status: u16 },
    #[error("unexpected payload from {path}: {source}")]
    Payload {
        path: String,
        #[source]
        source: PayloadError,
    },
    #[error("{path} has no '{field}'")]
    MissingField { path: String, field: &'static str },
}

/// Read-only access to a device's configuration objects.
pub trait Device {
    /// Returns the decoded object or collection stored at `path`.
    ///
    /// `path` is a bare resource path such as `/mgmt/tm/ltm/virtual`.
    fn fetch(&self, path: &str) -> Result<Payload, DeviceError>;
}

/// Fetches `link`, which may be a full URL or a path.
pub fn fetch_payload(device: &dyn Device, link: &str) -> Result<Payload, DeviceError> {
    let path = link::path_of(link);
    device.fetch(&path)
}

/// Fetches the collection at `link` and returns its items undecoded, so that
/// callers can decide what a bad item costs.
pub fn fetch_collection(device: &dyn Device, link: &str) -> Result<Vec<Value>, DeviceError> {
    fetch_payload(device, link)?
        .into_items()
        .map_err(|source| DeviceError::Payload {
            path: link::path_of(link),
            source,
        })
}

pub fn fetch_object<T: DeserializeOwned>(device: &dyn Device, link: &str) -> Result<T, DeviceError> {
    fetch_payload(device, link)?
        .decode_object()
        .map_err(|source| DeviceError::Payload {
            path: link::path_of(link),
            source,
        })
}
