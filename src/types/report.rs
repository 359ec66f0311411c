//! Request and report shapes exchanged at the engine boundary.

use super::port::{Port, PortSpec};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A port scan request as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Hostname or literal IP address.
    pub target: String,
    /// Port specification, e.g. `"22,80,8000-8100"`.
    #[serde(default = "default_port_range")]
    pub port_range: String,
}

fn default_port_range() -> String {
    "1-1000".to_string()
}

impl ScanRequest {
    pub fn new(target: impl Into<String>, port_range: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            port_range: port_range.into(),
        }
    }
}

/// Result of probing one port. Produced once per port per scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub port: Port,
    pub open: bool,
}

impl ProbeOutcome {
    pub const fn new(port: Port, open: bool) -> Self {
        Self { port, open }
    }
}

/// Final status of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Completed,
    Error,
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// An open port together with its inferred service label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPort {
    pub port: Port,
    pub service: String,
}

/// The report returned for every scan, whatever path produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub status: ScanStatus,
    pub target_ip: String,
    pub open_ports: Vec<OpenPort>,
    pub total_ports_scanned: usize,
    /// Unix timestamp (seconds).
    pub scan_date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ScanReport {
    /// A completed report. Callers are responsible for `open_ports` ordering;
    /// see [`ScanReport::conform_to`].
    pub fn completed(target_ip: impl Into<String>, open_ports: Vec<OpenPort>, total: usize) -> Self {
        Self {
            status: ScanStatus::Completed,
            target_ip: target_ip.into(),
            open_ports,
            total_ports_scanned: total,
            scan_date: Utc::now().timestamp(),
            message: None,
        }
    }

    /// A terminal failure: nothing was probed and no ports are reported.
    pub fn failed(target_ip: impl Into<String>, total: usize, message: impl Into<String>) -> Self {
        Self {
            status: ScanStatus::Error,
            target_ip: target_ip.into(),
            open_ports: Vec::new(),
            total_ports_scanned: total,
            scan_date: Utc::now().timestamp(),
            message: Some(message.into()),
        }
    }

    /// Force the report into the shared shape for `spec`: open ports limited
    /// to the requested set, unique and ascending, and the total equal to the
    /// size of the set.
    pub fn conform_to(mut self, spec: &PortSpec) -> Self {
        self.open_ports.retain(|p| spec.contains(p.port));
        self.open_ports.sort_by_key(|p| p.port);
        self.open_ports.dedup_by_key(|p| p.port);
        self.total_ports_scanned = spec.len();
        self
    }
}
