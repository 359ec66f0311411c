//! Real-versus-approximate scan decision.

use crate::types::PortSpec;
use std::fmt;

/// Port count above which a request is answered by the approximate scanner.
/// Also the highest threshold a policy accepts.
pub const LARGE_SCAN_THRESHOLD: usize = 1000;

/// Execution path chosen for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPath {
    /// Resolve, probe every port, aggregate.
    Full,
    /// Hand the request to the approximate scanner.
    Approximate,
}

impl fmt::Display for ScanPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Approximate => write!(f, "approximate"),
        }
    }
}

/// Chooses a [`ScanPath`] from the size of the expanded port set.
///
/// Keeps worst-case wall-clock time and socket usage bounded no matter how
/// large a requested range is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPolicy {
    threshold: usize,
}

impl ScanPolicy {
    /// Thresholds above [`LARGE_SCAN_THRESHOLD`] are lowered to it.
    pub const fn new(threshold: usize) -> Self {
        let threshold = if threshold > LARGE_SCAN_THRESHOLD {
            LARGE_SCAN_THRESHOLD
        } else {
            threshold
        };
        Self { threshold }
    }

    pub fn choose(&self, spec: &PortSpec) -> ScanPath {
        if spec.len() > self.threshold {
            ScanPath::Approximate
        } else {
            ScanPath::Full
        }
    }
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self::new(LARGE_SCAN_THRESHOLD)
    }
}
