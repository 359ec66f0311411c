//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of scan reports.
//! Reports go to stdout; status messages go to stderr so machine-readable
//! output stays clean.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::{
    print_error, print_info, print_scan_header, print_success, print_warning, write_plain,
};

use crate::cli::OutputFormat;
use crate::storage::ScanRecord;
use std::io::{self, Write};

/// Write a freshly produced scan. JSON output is the bare report.
pub fn write_report<W: Write>(out: &mut W, record: &ScanRecord, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => write_plain(out, record),
        OutputFormat::Json => write_json(out, &record.report),
        OutputFormat::Csv => write_csv(out, &record.report),
    }
}

/// Write a stored scan. JSON output is the whole record, request included.
pub fn write_record<W: Write>(out: &mut W, record: &ScanRecord, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(out, record),
        other => write_report(out, record, other),
    }
}

/// Print a freshly produced scan to stdout.
pub fn print_report(record: &ScanRecord, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, record, format)
}
