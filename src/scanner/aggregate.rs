//! Turns raw probe outcomes into a [`ScanReport`].

use crate::services::service_label;
use crate::types::{OpenPort, ProbeOutcome, ScanReport};
use std::net::IpAddr;

/// Build the completed report for a finished probe run.
///
/// Keeps open outcomes only, labels them from the well-known port table and
/// sorts ascending by port. `total_ports` is the size of the requested port
/// set, not the number of open ports.
pub fn aggregate(
    target: IpAddr,
    outcomes: impl IntoIterator<Item = ProbeOutcome>,
    total_ports: usize,
) -> ScanReport {
    let mut open_ports: Vec<OpenPort> = outcomes
        .into_iter()
        .filter(|o| o.open)
        .map(|o| OpenPort {
            port: o.port,
            service: service_label(o.port.as_u16()).to_string(),
        })
        .collect();

    open_ports.sort_by_key(|p| p.port);
    open_ports.dedup_by_key(|p| p.port);

    ScanReport::completed(target.to_string(), open_ports, total_ports)
}
