use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_OUTPUT: &str = "virtual_servers.csv";

/// Everything a single export run needs to know, resolved up front by the CLI.
#[derive(Clone)]
pub struct Config {
    /// BIG-IP hostname or address, optionally with a `:port` suffix.
    pub hostname: String,
    pub username: String,
    pub password: String,
    /// Verify the device's TLS certificate.
    ///
    /// Most BIG-IPs ship with a self-signed management certificate, hence the
    /// `--no-ssl-verify` switch.
    pub verify_tls: bool,
    pub timeout: Duration,
    pub output: PathBuf,
    pub address_lists: AddressListPolicy,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("hostname", &self.hostname)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .field("output", &self.output)
            .field("address_lists", &self.address_lists)
            .finish()
    }
}

/// What to do with virtual servers whose destination comes from an address
/// list (`trafficMatchingCriteriaReference`) instead of a literal address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressListPolicy {
    /// Emit the row with the broadcast placeholder as destination.
    #[default]
    Placeholder,
    /// Leave the virtual server out of the export.
    Skip,
}

impl FromStr for AddressListPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "placeholder" => Ok(Self::Placeholder),
            "skip" => Ok(Self::Skip),
            _ => Err(format!("invalid address list policy: {s} (expected 'placeholder' or 'skip')")),
        }
    }
}

impl fmt::Display for AddressListPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => f.write_str("placeholder"),
            Self::Skip => f.write_str("skip"),
        }
    }
}
