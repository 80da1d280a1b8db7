//! # Virtual Server Destinations
//!
//! BIG-IP stores a virtual server's listener as a single string such as
//! `/Common/10.1.1.1:80` or `/Common/2001:db8::1:443`. This module splits that
//! string into the address and the port.
//!
//! The port is anchored to the end of the string, which is what lets an IPv6
//! address keep its own colons. A route-domain suffix (`10.1.1.1%2:80`) is
//! accepted and dropped from the address. IPv6 addresses may end in a dotted
//! IPv4 tail, as in `::ffff:10.1.1.1:80`.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Stand-in address for destinations that cannot be parsed.
pub const PLACEHOLDER_ADDRESS: &str = "0.0.0.0";

/// Stand-in address for virtual servers that listen on an address list.
pub const ADDRESS_LIST_ADDRESS: &str = "255.255.255.255";

const DESTINATION_PATTERN: &str = r"(?P<address>\d{1,3}(?:\.\d{1,3}){3}|[0-9a-fA-F]*:[0-9a-fA-F:]*(?:\d{1,3}(?:\.\d{1,3}){3})?)(?:%\d+)?:(?P<port>\d+)$";

static DESTINATION_RE: OnceLock<Regex> = OnceLock::new();

fn destination_re() -> &'static Regex {
    DESTINATION_RE.get_or_init(|| Regex::new(DESTINATION_PATTERN).expect("destination pattern is valid"))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DestinationError {
    #[error("no address:port found in destination '{0}'")]
    NoMatch(String),
}

/// A destination split into its address and port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub address: String,
    pub port: String,
}

impl Destination {
    pub fn new(address: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port: port.into(),
        }
    }
}

/// Splits a destination string into address and port.
///
/// Anything before the address (the partition, usually `/Common/`) is ignored.
pub fn parse_destination(destination: &str) -> Result<Destination, DestinationError> {
    let caps = destination_re()
        .captures(destination)
        .ok_or_else(|| DestinationError::NoMatch(destination.to_string()))?;

    let parsed = Destination::new(&caps["address"], &caps["port"]);
    debug!(input = destination, address = %parsed.address, port = %parsed.port, "parsed destination");
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("10.0.0.5:443", "10.0.0.5", "443" ; "ipv4")]
    #[test_case("/Common/10.1.1.1:80", "10.1.1.1", "80" ; "ipv4 with partition")]
    #[test_case("2001:db8::1:8443", "2001:db8::1", "8443" ; "ipv6")]
    #[test_case("/Common/2001:db8:0:0:0:0:0:5:443", "2001:db8:0:0:0:0:0:5", "443" ; "ipv6 uncompressed")]
    #[test_case("/Tenant/10.1.1.1%2:8080", "10.1.1.1", "8080" ; "ipv4 with route domain")]
    #[test_case("fe80::1%3:22", "fe80::1", "22" ; "ipv6 with route domain")]
    #[test_case("0.0.0.0:0", "0.0.0.0", "0" ; "any address")]
    #[test_case("::ffff:10.1.1.1:80", "::ffff:10.1.1.1", "80" ; "ipv4 mapped ipv6")]
    #[test_case("/Common/::ffff:192.0.2.7%4:443", "::ffff:192.0.2.7", "443" ; "ipv4 mapped ipv6 with route domain")]
    #[test_case("/Common/64:ff9b::198.51.100.2:53", "64:ff9b::198.51.100.2", "53" ; "ipv4 embedded ipv6")]
    fn splits_address_and_port(input: &str, address: &str, port: &str) {
        assert_eq!(parse_destination(input), Ok(Destination::new(address, port)));
    }

    #[test_case("/Common/addr-list-vs" ; "address list name")]
    #[test_case("10.0.0.5" ; "missing port")]
    #[test_case("10.0.0.5:" ; "empty port")]
    #[test_case("10.0.0.5:http" ; "named port")]
    #[test_case("" ; "empty")]
    fn rejects_destinations_without_port(input: &str) {
        assert_eq!(
            parse_destination(input),
            Err(DestinationError::NoMatch(input.to_string()))
        );
    }
}
