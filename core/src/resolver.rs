//! # Reverse-DNS Resolution
//!
//! Turns addresses into host names for the export. A failed lookup is never
//! an error for the caller: [`NameResolver::resolve`] always returns a
//! [`ResolvedName`], falling back to the address itself.

use std::io;
use std::net::IpAddr;

use f5export_common::record::ResolvedName;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("'{0}' is not an IP address")]
    InvalidAddress(String),
    #[error("no reverse record for {0}")]
    NoRecord(String),
    #[error("reverse lookup of {address} failed: {source}")]
    Io {
        address: String,
        #[source]
        source: io::Error,
    },
}

/// Outcome of a single reverse lookup, before the fallback policy is applied.
#[derive(Debug)]
pub enum Lookup {
    Resolved(String),
    Unresolved(LookupError),
}

impl Lookup {
    pub fn into_name(self, address: &str) -> ResolvedName {
        match self {
            Lookup::Resolved(hostname) => ResolvedName::from_hostname(&hostname),
            Lookup::Unresolved(_) => ResolvedName::unresolved(address),
        }
    }
}

pub trait NameResolver {
    /// One reverse lookup attempt, no retries.
    fn lookup(&self, address: &str) -> Result<String, LookupError>;

    fn resolve_outcome(&self, address: &str) -> Lookup {
        match self.lookup(address) {
            Ok(hostname) => Lookup::Resolved(hostname),
            Err(e) => {
                debug!("{e}");
                Lookup::Unresolved(e)
            }
        }
    }

    fn resolve(&self, address: &str) -> ResolvedName {
        let name = self.resolve_outcome(address).into_name(address);
        debug!(input = address, hostname = %name.shortname, fqdn = %name.fqdn, "resolved");
        name
    }
}

/// Resolver backed by the system's `getnameinfo`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DnsResolver;

impl DnsResolver {
    pub fn new() -> Self {
        Self
    }
}

impl NameResolver for DnsResolver {
    fn lookup(&self, address: &str) -> Result<String, LookupError> {
        let ip: IpAddr = address
            .parse()
            .map_err(|_| LookupError::InvalidAddress(address.to_string()))?;

        let hostname = dns_lookup::lookup_addr(&ip).map_err(|source| LookupError::Io {
            address: address.to_string(),
            source,
        })?;

        // getnameinfo hands back the numeric form when there is no PTR record.
        if hostname.is_empty() || hostname.parse::<IpAddr>().is_ok_and(|parsed| parsed == ip) {
            return Err(LookupError::NoRecord(address.to_string()));
        }

        Ok(hostname)
    }
}
