#![cfg(test)]
use std::path::Path;

use f5export_common::record::OutputRow;
use f5export_core::export::CsvSink;
use f5export_core::inventory::{InventoryError, InventoryWalker, WalkOptions, WalkSummary};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::fixtures::{FakeBigIp, FakeDns};

const HEADER_LINE: &str = "VS Name,VS FQDN,Pool Member Hosts\r\n";

fn export_to(path: &Path, device: &FakeBigIp, dns: &FakeDns) -> Result<WalkSummary, InventoryError> {
    let mut sink = CsvSink::create(path).expect("output file should be writable");
    InventoryWalker::new(device, dns, WalkOptions::default()).walk(&mut sink, &mut ())
}

fn export_rows(device: &FakeBigIp, dns: &FakeDns) -> Vec<OutputRow> {
    let mut rows: Vec<OutputRow> = Vec::new();
    InventoryWalker::new(device, dns, WalkOptions::default())
        .walk(&mut rows, &mut ())
        .expect("walk should succeed");
    rows
}

/// One virtual server, a two-member pool and no reverse records anywhere.
#[test]
fn unresolved_pool_members_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("virtual_servers.csv");
    let device = FakeBigIp::new()
        .virtual_server("/Common/vs1", "/Common/10.1.1.1:80", Some("/Common/pool1"))
        .pool("/Common/pool1", &["10.1.1.2", "10.1.1.3"]);

    let summary = export_to(&path, &device, &FakeDns::new()).unwrap();

    assert_eq!(summary.rows, 1);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        format!("{HEADER_LINE}/Common/vs1,unresolved,\"10.1.1.2, 10.1.1.3\"\r\n")
    );
}

#[test]
fn virtual_server_without_pool_gets_none() {
    let device = FakeBigIp::new().virtual_server("/Common/redirect_vs", "/Common/10.2.2.2:80", None);
    let dns = FakeDns::new().ptr("10.2.2.2", "redirect.example.com");

    let rows = export_rows(&device, &dns);

    assert_eq!(
        rows,
        vec![OutputRow::new("/Common/redirect_vs", "redirect.example.com", "None")]
    );
}

#[test]
fn device_order_is_preserved() {
    let device = FakeBigIp::new()
        .virtual_server("/Common/zeta", "/Common/10.0.0.3:80", Some("/Common/pool_z"))
        .virtual_server("/Common/alpha", "/Common/10.0.0.1:80", None)
        .virtual_server("/Common/mid", "/Common/2001:db8::10:443", Some("/Common/pool_m"))
        .pool("/Common/pool_z", &["10.9.0.3", "10.9.0.1", "10.9.0.2"])
        .pool("/Common/pool_m", &["2001:db8::22", "2001:db8::21"]);
    let dns = FakeDns::new()
        .ptr("10.9.0.1", "app1.example.com")
        .ptr("2001:db8::21", "v6app");

    let rows = export_rows(&device, &dns);

    let names: Vec<&str> = rows.iter().map(|row| row.vs_name.as_str()).collect();
    assert_eq!(names, vec!["/Common/zeta", "/Common/alpha", "/Common/mid"]);
    assert_eq!(rows[0].pool_member_hosts, "10.9.0.3, app1, 10.9.0.2");
    assert_eq!(rows[2].pool_member_hosts, "2001:db8::22, v6app");
}

#[test]
fn one_row_per_virtual_server_despite_failures() {
    let device = FakeBigIp::new()
        .virtual_server("/Common/ok", "/Common/10.0.0.1:80", Some("/Common/good"))
        .virtual_server("/Common/dangling", "/Common/10.0.0.2:80", Some("/Common/missing"))
        .virtual_server("/Common/broken", "/Common/10.0.0.3:80", Some("/Common/bad"))
        .virtual_server("/Common/weird", "/Common/weird_destination", None)
        .pool("/Common/good", &["10.0.1.1"])
        .pool("/Common/bad", &["10.0.3.1"])
        .break_members("/Common/bad");

    let summary = InventoryWalker::new(&device, &FakeDns::new(), WalkOptions::default())
        .walk(&mut Vec::<OutputRow>::new(), &mut ())
        .unwrap();

    assert_eq!(summary.listed, 4);
    assert_eq!(summary.rows, 4);
    assert_eq!(summary.pool_failures, 2);
    assert_eq!(summary.unparsed_destinations, 1);
}

#[test]
fn malformed_listing_item_does_not_stop_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("virtual_servers.csv");
    let device = FakeBigIp::new()
        .virtual_server("/Common/vs1", "/Common/10.1.1.1:80", None)
        .raw_virtual_server(json!({ "fullPath": "/Common/odd", "destination": null }))
        .virtual_server("/Common/vs2", "/Common/10.1.1.2:80", None);

    let summary = export_to(&path, &device, &FakeDns::new()).unwrap();

    assert_eq!(summary.rows, 3);
    assert_eq!(summary.malformed, 1);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        format!(
            "{HEADER_LINE}/Common/vs1,unresolved,None\r\n/Common/odd,unresolved,None\r\n/Common/vs2,unresolved,None\r\n"
        )
    );
}

#[test]
fn failed_listing_leaves_only_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("virtual_servers.csv");
    let device = FakeBigIp::new()
        .virtual_server("/Common/vs1", "/Common/10.1.1.1:80", None)
        .break_listing();

    let result = export_to(&path, &device, &FakeDns::new());

    assert!(matches!(result, Err(InventoryError::List(_))));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), HEADER_LINE);
}

#[test]
fn repeated_export_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("virtual_servers.csv");
    let device = FakeBigIp::new()
        .virtual_server("/Common/vs1", "/Common/10.1.1.1:80", Some("/Common/pool1"))
        .virtual_server("/Common/vs2", "/Common/10.1.1.5:443", None)
        .pool("/Common/pool1", &["10.1.1.2", "10.1.1.3"]);
    let dns = FakeDns::new().ptr("10.1.1.1", "www.example.com").ptr("10.1.1.3", "web03.example.com");

    export_to(&path, &device, &dns).unwrap();
    let first = std::fs::read(&path).unwrap();
    export_to(&path, &device, &dns).unwrap();
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn pool_links_are_followed_as_paths() {
    let device = FakeBigIp::new()
        .virtual_server("/Common/vs1", "/Common/10.1.1.1:80", Some("/Common/pool1"))
        .pool("/Common/pool1", &["10.1.1.2"]);

    export_rows(&device, &FakeDns::new());

    assert_eq!(
        *device.requests.borrow(),
        vec![
            "/mgmt/tm/ltm/virtual",
            "/mgmt/tm/ltm/pool/~Common~pool1",
            "/mgmt/tm/ltm/pool/~Common~pool1/members",
        ]
    );
}
