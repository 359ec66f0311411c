//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::storage::ScanRecord;
use crate::types::ScanStatus;
use console::style;
use std::io::{self, Write};

const HEAVY_RULE: &str = "═══════════════════════════════════════════════════════════════";
const LIGHT_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Write a record in human-readable plain text format.
pub fn write_plain<W: Write>(out: &mut W, record: &ScanRecord) -> io::Result<()> {
    let report = &record.report;

    // Header
    writeln!(out)?;
    writeln!(out, "{}", style(HEAVY_RULE).cyan())?;
    writeln!(
        out,
        "                    {} Port Scan Report",
        style("hostscan").cyan().bold()
    )?;
    writeln!(out, "{}", style(HEAVY_RULE).cyan())?;
    writeln!(out)?;

    // Scan info
    writeln!(out, "  {} {}", style("Target:").bold(), record.request.target)?;
    if !report.target_ip.is_empty() {
        writeln!(out, "  {} {}", style("IP Address:").bold(), report.target_ip)?;
    }
    writeln!(out, "  {} {}", style("Ports:").bold(), record.request.port_range)?;
    writeln!(
        out,
        "  {} {}",
        style("Scan ID:").bold(),
        style(record.id.short()).dim()
    )?;

    let status = match report.status {
        ScanStatus::Completed => style(report.status.to_string()).green(),
        ScanStatus::Error => style(report.status.to_string()).red().bold(),
    };
    writeln!(out, "  {} {}", style("Status:").bold(), status)?;
    if let Some(message) = &report.message {
        writeln!(out, "  {} {}", style("Message:").bold(), message)?;
    }
    writeln!(out)?;

    // Statistics
    writeln!(
        out,
        "  {} {} open of {} ports scanned",
        style("Statistics:").bold(),
        style(report.open_ports.len()).green().bold(),
        report.total_ports_scanned
    )?;
    writeln!(out)?;

    // Port table
    if report.open_ports.is_empty() {
        writeln!(out, "  {}", style("No open ports found.").dim())?;
    } else {
        writeln!(out, "  {}", style(LIGHT_RULE).dim())?;
        writeln!(
            out,
            "  {:>6}  {:<15}",
            style("PORT").bold(),
            style("SERVICE").bold()
        )?;
        writeln!(out, "  {}", style(LIGHT_RULE).dim())?;

        for open in &report.open_ports {
            writeln!(
                out,
                "  {:>6}  {:<15}",
                style(open.port).green().bold(),
                open.service
            )?;
        }

        writeln!(out, "  {}", style(LIGHT_RULE).dim())?;
    }

    writeln!(out)?;
    writeln!(out, "{}", style(HEAVY_RULE).cyan())?;
    writeln!(out)?;

    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &str, ports: &str, port_count: usize) {
    eprintln!();
    eprintln!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("hostscan").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("{} Target: {}", style("•").dim(), style(target).white().bold());
    eprintln!(
        "{} Scanning {} ports ({})...",
        style("•").dim(),
        style(port_count).white().bold(),
        ports
    );
    eprintln!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    eprintln!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    eprintln!("{} {}", style("ℹ").blue().bold(), msg);
}
