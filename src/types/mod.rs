//! Core type definitions using newtype patterns for type safety.
//!
//! These types prevent common logic errors by making invalid states unrepresentable
//! at compile time.

mod port;
mod report;
mod scan_id;
mod target;

pub use port::{Port, PortError, PortRange, PortSpec};
pub use report::{OpenPort, ProbeOutcome, ScanReport, ScanRequest, ScanStatus};
pub use scan_id::{ScanId, ScanIdError};
pub use target::{ResolvedTarget, TargetError, TargetResolver};
