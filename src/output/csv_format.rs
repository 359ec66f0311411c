//! CSV output formatting.

use crate::types::ScanReport;
use std::io::{self, Write};

/// Write the open ports of a report as `port,service` rows.
pub fn write_csv<W: Write>(out: W, report: &ScanReport) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["port", "service"])?;
    for open in &report.open_ports {
        wtr.write_record([open.port.to_string().as_str(), open.service.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}
