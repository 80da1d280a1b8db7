//! # iControl REST Wire Format
//!
//! Request paths, authentication bodies and the response envelope of the
//! BIG-IP management API.
//!
//! Collections come back as `{"kind": "...collectionstate", "items": [...]}`.
//! An empty collection omits `items` altogether, so the `kind` suffix is what
//! identifies a collection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

pub const VIRTUAL_SERVERS_PATH: &str = "/mgmt/tm/ltm/virtual";
pub const POOLS_PATH: &str = "/mgmt/tm/ltm/pool";
pub const LOGIN_PATH: &str = "/mgmt/shared/authn/login";
pub const VERSION_PATH: &str = "/mgmt/tm/sys/version";

pub const AUTH_TOKEN_HEADER: &str = "X-F5-Auth-Token";
pub const LOGIN_PROVIDER: &str = "tmos";

const COLLECTION_KIND_SUFFIX: &str = "collectionstate";

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("expected a collection, got a single object")]
    NotACollection,
    #[error("expected a single object, got a collection of {0} items")]
    NotAnObject(usize),
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Object(Value),
    Collection(Vec<Value>),
}

impl Payload {
    pub fn from_json(body: Value) -> Self {
        let is_collection = body
            .get("kind")
            .and_then(Value::as_str)
            .is_some_and(|kind| kind.ends_with(COLLECTION_KIND_SUFFIX))
            || body.get("items").is_some_and(Value::is_array);

        if !is_collection {
            return Payload::Object(body);
        }

        match body {
            Value::Object(mut map) => match map.remove("items") {
                Some(Value::Array(items)) => Payload::Collection(items),
                _ => Payload::Collection(Vec::new()),
            },
            other => Payload::Object(other),
        }
    }

    pub fn into_items(self) -> Result<Vec<Value>, PayloadError> {
        match self {
            Payload::Collection(items) => Ok(items),
            Payload::Object(_) => Err(PayloadError::NotACollection),
        }
    }

    pub fn into_object(self) -> Result<Value, PayloadError> {
        match self {
            Payload::Object(value) => Ok(value),
            Payload::Collection(items) => Err(PayloadError::NotAnObject(items.len())),
        }
    }

    pub fn decode_object<T: DeserializeOwned>(self) -> Result<T, PayloadError> {
        Ok(serde_json::from_value(self.into_object()?)?)
    }
}

/// Body of `POST /mgmt/shared/authn/login`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub login_provider_name: &'a str,
}

impl<'a> LoginRequest<'a> {
    pub fn new(username: &'a str, password: &'a str) -> Self {
        Self {
            username,
            password,
            login_provider_name: LOGIN_PROVIDER,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: AuthToken,
}

#[derive(Debug, Deserialize)]
pub struct AuthToken {
    pub token: String,
}

/// Response of `GET /mgmt/tm/sys/version`.
///
/// The interesting fields sit two levels down, keyed by a self link:
/// `entries.<link>.nestedStats.entries.Version.description`.
#[derive(Debug, Default, Deserialize)]
pub struct VersionResponse {
    #[serde(default)]
    entries: BTreeMap<String, NestedStats>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NestedStats {
    #[serde(default)]
    nested_stats: StatEntries,
}

#[derive(Debug, Default, Deserialize)]
struct StatEntries {
    #[serde(default)]
    entries: BTreeMap<String, StatDescription>,
}

#[derive(Debug, Deserialize)]
struct StatDescription {
    description: Value,
}

impl VersionResponse {
    fn field(&self, name: &str) -> Option<String> {
        self.entries
            .values()
            .find_map(|stats| stats.nested_stats.entries.get(name))
            .map(|stat| match &stat.description {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
    }

    /// e.g. `BIG-IP`
    pub fn product(&self) -> Option<String> {
        self.field("Product")
    }

    /// e.g. `16.1.3`
    pub fn version(&self) -> Option<String> {
        self.field("Version")
    }

    pub fn build(&self) -> Option<String> {
        self.field("Build")
    }
}

/// Encodes a partition path for use in a URL: `/Common/web` becomes `~Common~web`.
pub fn encode_full_path(full_path: &str) -> String {
    full_path.replace('/', "~")
}

/// Path of a pool given its full path, for virtual servers that name a pool
/// without carrying a `poolReference`.
pub fn pool_path(full_path: &str) -> String {
    format!("{POOLS_PATH}/{}", encode_full_path(full_path))
}
