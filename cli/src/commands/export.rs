use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;

use crate::terminal::{colors, print, spinner};
use f5export_common::config::Config;
use f5export_common::ltm::VirtualServer;
use f5export_common::record::OutputRow;
use f5export_core::device::BigIpClient;
use f5export_core::export::CsvSink;
use f5export_core::inventory::{InventoryWalker, WalkObserver, WalkOptions, WalkSummary};
use f5export_core::resolver::DnsResolver;

pub fn export(cfg: &Config) -> anyhow::Result<()> {
    print::header("connecting");
    let start_time: Instant = Instant::now();

    let device = BigIpClient::connect(cfg).context("cannot open a session with the BIG-IP")?;
    let mut sink = CsvSink::create(&cfg.output)
        .with_context(|| format!("cannot create {}", cfg.output.display()))?;

    let options = WalkOptions {
        address_lists: cfg.address_lists,
        ..WalkOptions::default()
    };
    let resolver = DnsResolver::new();
    let walker = InventoryWalker::new(&device, &resolver, options);

    print::header("virtual servers");
    spinner::start("Listing virtual servers...");
    let mut observer = TerminalObserver::default();
    let result = walker.walk(&mut sink, &mut observer);
    spinner::finish();

    let summary: WalkSummary = result?;
    print_summary(&summary, &cfg.output, start_time.elapsed());
    Ok(())
}

#[derive(Default)]
struct TerminalObserver {
    total: usize,
    done: usize,
}

impl WalkObserver for TerminalObserver {
    fn listed(&mut self, count: usize) {
        self.total = count;
    }

    fn virtual_server(&mut self, vs: &VirtualServer) {
        print::print_status(format!(
            "Virtual Server: {}",
            vs.full_path.color(colors::VIRTUAL_SERVER)
        ));
    }

    fn pool(&mut self, pool: &str) {
        print::print_status(format!("default_pool: {}", pool.color(colors::POOL)));
    }

    fn row(&mut self, _row: &OutputRow) {
        self.done += 1;
        spinner::report_progress(self.done, self.total);
    }
}

fn print_summary(summary: &WalkSummary, output: &Path, total_time: Duration) {
    const KEY_WIDTH: usize = 12;

    print::header("summary");
    print::aligned_line("Listed", KEY_WIDTH, summary.listed.to_string());
    print::aligned_line("Rows", KEY_WIDTH, summary.rows.to_string().bold().green());
    if summary.skipped > 0 {
        print::aligned_line("Skipped", KEY_WIDTH, summary.skipped.to_string().color(colors::WARNING));
    }
    if summary.unparsed_destinations > 0 {
        print::aligned_line(
            "Placeholders",
            KEY_WIDTH,
            summary.unparsed_destinations.to_string().color(colors::WARNING),
        );
    }
    if summary.malformed > 0 {
        print::aligned_line("Malformed", KEY_WIDTH, summary.malformed.to_string().color(colors::WARNING));
    }
    if summary.dropped > 0 {
        print::aligned_line("Dropped", KEY_WIDTH, summary.dropped.to_string().color(colors::WARNING));
    }
    if summary.pool_failures > 0 {
        print::aligned_line("Pool errors", KEY_WIDTH, summary.pool_failures.to_string().color(colors::WARNING));
    }
    print::aligned_line("Output", KEY_WIDTH, output.display().to_string().color(colors::ACCENT));

    let rows: ColoredString = format!("{} rows", summary.rows).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let line: ColoredString =
        format!("Export Complete: {rows} written in {total_time}").color(colors::TEXT_DEFAULT);

    print::fat_separator();
    print::centerln(&line.to_string());
}
