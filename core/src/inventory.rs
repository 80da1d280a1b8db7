//! # Inventory Walker
//!
//! Drives an export run: lists the device's virtual servers and turns each one
//! into exactly one [`OutputRow`].
//!
//! Per virtual server:
//! 1. the destination is split into address and port (unparsable
//!    destinations fall back to a placeholder address),
//! 2. the address is reverse-resolved for the fqdn column,
//! 3. the default pool, when there is one, is fetched along with its members,
//!    each member address being reverse-resolved,
//! 4. the row is appended to the sink.
//!
//! Only the initial listing and writing to the sink can fail the run. Every
//! other failure is logged and the row is still produced, down to a listing
//! item that does not decode: its readable fields are exported. An item with
//! no `fullPath` has nothing to name its row by and is counted as dropped.

use f5export_common::config::AddressListPolicy;
use f5export_common::ltm::{Pool, PoolMember, Reference, VirtualServer};
use f5export_common::network::destination::{
    self, ADDRESS_LIST_ADDRESS, Destination, PLACEHOLDER_ADDRESS,
};
use f5export_common::record::{MEMBER_SEPARATOR, NO_POOL, OutputRow};
use f5export_protocols::icontrol::{self, VIRTUAL_SERVERS_PATH};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::device::{self, Device, DeviceError};
use crate::export::{ExportError, ResultSink};
use crate::resolver::NameResolver;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("cannot list virtual servers: {0}")]
    List(#[source] DeviceError),
    #[error(transparent)]
    Sink(#[from] ExportError),
}

#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub address_lists: AddressListPolicy,
    /// Address used when a destination cannot be parsed.
    pub placeholder: String,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            address_lists: AddressListPolicy::default(),
            placeholder: PLACEHOLDER_ADDRESS.to_string(),
        }
    }
}

/// Progress hooks for whoever is watching the run. All methods default to no-ops.
pub trait WalkObserver {
    fn listed(&mut self, _count: usize) {}
    fn virtual_server(&mut self, _vs: &VirtualServer) {}
    fn pool(&mut self, _pool: &str) {}
    fn row(&mut self, _row: &OutputRow) {}
}

impl WalkObserver for () {}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkSummary {
    /// Virtual servers returned by the device.
    pub listed: usize,
    pub rows: usize,
    /// Address-list virtual servers left out under [`AddressListPolicy::Skip`].
    pub skipped: usize,
    pub unparsed_destinations: usize,
    pub pool_failures: usize,
    /// Listing items that did not decode cleanly.
    pub malformed: usize,
    /// Malformed items without a `fullPath`, which cannot be given a row.
    pub dropped: usize,
}

/// What became of a virtual server's default pool.
#[derive(Debug)]
pub enum PoolOutcome {
    NoPool,
    Members(Vec<String>),
    /// Fetching stopped part-way; `members` holds what was resolved before.
    Failed {
        members: Vec<String>,
        error: DeviceError,
    },
}

impl PoolOutcome {
    /// Value of the "Pool Member Hosts" column.
    pub fn to_column(&self) -> String {
        match self {
            PoolOutcome::NoPool => NO_POOL.to_string(),
            PoolOutcome::Members(members) | PoolOutcome::Failed { members, .. } => {
                members.join(MEMBER_SEPARATOR)
            }
        }
    }
}

pub struct InventoryWalker<'a> {
    device: &'a dyn Device,
    resolver: &'a dyn NameResolver,
    options: WalkOptions,
}

impl<'a> InventoryWalker<'a> {
    pub fn new(device: &'a dyn Device, resolver: &'a dyn NameResolver, options: WalkOptions) -> Self {
        Self {
            device,
            resolver,
            options,
        }
    }

    /// Exports every virtual server on the device into `sink`, in device order.
    pub fn walk(
        &self,
        sink: &mut dyn ResultSink,
        observer: &mut dyn WalkObserver,
    ) -> Result<WalkSummary, InventoryError> {
        let items = device::fetch_collection(self.device, VIRTUAL_SERVERS_PATH)
            .map_err(InventoryError::List)?;
        info!("Found {} virtual servers", items.len());
        observer.listed(items.len());

        let mut summary = WalkSummary {
            listed: items.len(),
            ..WalkSummary::default()
        };

        for item in items {
            let vs = match serde_json::from_value::<VirtualServer>(item.clone()) {
                Ok(vs) => vs,
                Err(e) => {
                    summary.malformed += 1;
                    match salvage_virtual_server(&item) {
                        Some(vs) => {
                            warn!(
                                "{}: malformed virtual server ({e}), exporting what is readable",
                                vs.full_path
                            );
                            vs
                        }
                        None => {
                            warn!("virtual server without a readable fullPath dropped: {e}");
                            summary.dropped += 1;
                            continue;
                        }
                    }
                }
            };
            let vs = &vs;

            observer.virtual_server(vs);
            debug!(?vs, "processing virtual server");

            let address = match self.listener_address(vs) {
                Some(Ok(destination)) => destination.address,
                Some(Err(e)) => {
                    warn!("{}: {e}, using {}", vs.full_path, self.options.placeholder);
                    summary.unparsed_destinations += 1;
                    self.options.placeholder.clone()
                }
                None => {
                    info!("{}: address list in use, skipping", vs.full_path);
                    summary.skipped += 1;
                    continue;
                }
            };

            let fqdn = self.resolver.resolve(&address).fqdn;

            if let Some(pool) = &vs.pool {
                observer.pool(pool);
            }
            let members = self.pool_members(vs);
            if let PoolOutcome::Failed { error, .. } = &members {
                info!("{}: pool lookup failed: {error}", vs.full_path);
                summary.pool_failures += 1;
            }

            let row = OutputRow::new(vs.full_path.clone(), fqdn, members.to_column());
            sink.append(&row)?;
            observer.row(&row);
            summary.rows += 1;
        }

        Ok(summary)
    }

    /// `None` means the virtual server is left out of the export.
    fn listener_address(
        &self,
        vs: &VirtualServer,
    ) -> Option<Result<Destination, destination::DestinationError>> {
        if vs.uses_address_list() {
            return match self.options.address_lists {
                AddressListPolicy::Skip => None,
                AddressListPolicy::Placeholder => {
                    Some(Ok(Destination::new(ADDRESS_LIST_ADDRESS, "0")))
                }
            };
        }
        Some(destination::parse_destination(&vs.destination))
    }

    /// Resolves the members of `vs`'s default pool, in device order.
    pub fn pool_members(&self, vs: &VirtualServer) -> PoolOutcome {
        let Some(pool_name) = &vs.pool else {
            return PoolOutcome::NoPool;
        };

        let mut members = Vec::new();
        match self.collect_members(vs, pool_name, &mut members) {
            Ok(()) => PoolOutcome::Members(members),
            Err(error) => PoolOutcome::Failed { members, error },
        }
    }

    fn collect_members(
        &self,
        vs: &VirtualServer,
        pool_name: &str,
        members: &mut Vec<String>,
    ) -> Result<(), DeviceError> {
        let pool_link = match &vs.pool_reference {
            Some(reference) => reference.link.clone(),
            None => icontrol::pool_path(pool_name),
        };
        let pool: Pool = device::fetch_object(self.device, &pool_link)?;

        let members_link = pool
            .members_reference
            .ok_or_else(|| DeviceError::MissingField {
                path: pool.full_path.clone(),
                field: "membersReference",
            })?
            .link;

        let items = device::fetch_collection(self.device, &members_link)?;

        for item in items {
            let member: PoolMember =
                serde_json::from_value(item).map_err(|e| DeviceError::Payload {
                    path: members_link.clone(),
                    source: e.into(),
                })?;
            members.push(self.resolver.resolve(&member.address).shortname);
        }
        debug!(pool = pool_name, ?members, "resolved pool members");

        Ok(())
    }
}

/// Reads the fields of a listing item one by one, keeping whichever are usable.
fn salvage_virtual_server(item: &Value) -> Option<VirtualServer> {
    let text = |field: &str| item.get(field).and_then(Value::as_str).map(str::to_string);
    let reference = |field: &str| {
        item.get(field)
            .and_then(|value| serde_json::from_value::<Reference>(value.clone()).ok())
    };

    Some(VirtualServer {
        full_path: text("fullPath")?,
        destination: text("destination").unwrap_or_default(),
        pool: text("pool"),
        pool_reference: reference("poolReference"),
        traffic_matching_criteria_reference: reference("trafficMatchingCriteriaReference"),
    })
}
