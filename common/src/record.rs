//! Rows of the export and the reverse-DNS names that fill them.

/// fqdn column value when an address has no usable reverse record.
pub const UNRESOLVED: &str = "unresolved";

/// Member column value for a virtual server without a default pool.
pub const NO_POOL: &str = "None";

pub const MEMBER_SEPARATOR: &str = ", ";

pub const HEADER: [&str; 3] = ["VS Name", "VS FQDN", "Pool Member Hosts"];

/// Result of reverse-resolving one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub shortname: String,
    /// The full resolved name, `""` when it has no domain part and
    /// [`UNRESOLVED`] when the lookup failed.
    pub fqdn: String,
}

impl ResolvedName {
    /// Builds the pair from a successfully resolved host name.
    pub fn from_hostname(hostname: &str) -> Self {
        match hostname.split_once('.') {
            Some((short, _)) => Self {
                shortname: short.to_string(),
                fqdn: hostname.to_string(),
            },
            None => Self {
                shortname: hostname.to_string(),
                fqdn: String::new(),
            },
        }
    }

    /// Fallback for an address that did not resolve.
    pub fn unresolved(address: &str) -> Self {
        Self {
            shortname: address.to_string(),
            fqdn: UNRESOLVED.to_string(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.fqdn != UNRESOLVED
    }
}

/// One line of the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub vs_name: String,
    pub vs_fqdn: String,
    pub pool_member_hosts: String,
}

impl OutputRow {
    pub fn new(
        vs_name: impl Into<String>,
        vs_fqdn: impl Into<String>,
        pool_member_hosts: impl Into<String>,
    ) -> Self {
        Self {
            vs_name: vs_name.into(),
            vs_fqdn: vs_fqdn.into(),
            pool_member_hosts: pool_member_hosts.into(),
        }
    }

    pub fn as_record(&self) -> [&str; 3] {
        [&self.vs_name, &self.vs_fqdn, &self.pool_member_hosts]
    }
}
