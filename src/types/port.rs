//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortRange` is a single token of a specification and `PortSpec` is the
//! normalized, deduplicated set of ports a scan will cover.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A validated network port number (1-65535).
///
/// Using a newtype prevents accidental misuse of raw u16 values
/// and ensures port numbers are always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(value.into()))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u64),
    #[error("invalid port number: {0}")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
    #[error("empty port specification")]
    Empty,
}

/// A range of ports (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    start: Port,
    end: Port,
}

impl PortRange {
    /// Create a new port range.
    fn new(start: Port, end: Port) -> Result<Self, PortError> {
        if start.0 > end.0 {
            Err(PortError::InvalidRange(start.0, end.0))
        } else {
            Ok(Self { start, end })
        }
    }

    /// Create a range containing a single port.
    pub const fn single(port: Port) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    /// Iterate over all ports in this range.
    pub fn iter(&self) -> impl Iterator<Item = Port> {
        (self.start.0..=self.end.0).map(Port)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for PortRange {
    type Err = PortError;

    /// Parse one token: either `N` or `START-END`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        match token.split_once('-') {
            Some((start, end)) => {
                let start = parse_port_number(start)?;
                let end = parse_port_number(end)?;
                Self::new(start, end)
            }
            None => parse_port_number(token).map(Self::single),
        }
    }
}

fn parse_port_number(s: &str) -> Result<Port, PortError> {
    let s = s.trim();
    let value: u64 = s
        .parse()
        .map_err(|_| PortError::InvalidFormat(s.to_string()))?;
    u16::try_from(value)
        .ok()
        .and_then(Port::new)
        .ok_or(PortError::OutOfRange(value))
}

/// A normalized port specification: distinct ports in ascending order.
///
/// Supports textual formats like:
/// - Single port: "80"
/// - Comma-separated: "80,443,8080"
/// - Range: "1-1000"
/// - Mixed: "22,80,443,8000-9000"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSpec {
    ports: Vec<Port>,
}

impl PortSpec {
    /// First port of the range used when a specification yields nothing.
    pub const DEFAULT_START: u16 = 1;
    /// Last port of the range used when a specification yields nothing.
    pub const DEFAULT_END: u16 = 1000;

    /// The default range, ports 1-1000.
    pub fn default_range() -> Self {
        Self::from_ranges([PortRange {
            start: Port(Self::DEFAULT_START),
            end: Port(Self::DEFAULT_END),
        }])
    }

    /// Build a specification from any collection of ranges, deduplicating.
    pub fn from_ranges(ranges: impl IntoIterator<Item = PortRange>) -> Self {
        let set: BTreeSet<Port> = ranges.into_iter().flat_map(|r| r.iter()).collect();
        Self {
            ports: set.into_iter().collect(),
        }
    }

    /// Parse a specification, silently dropping malformed tokens.
    ///
    /// Never fails: when no token survives (including an empty input) the
    /// default range 1-1000 is returned.
    pub fn parse_lenient(s: &str) -> Self {
        let ranges = s.split(',').filter_map(|token| match token.parse::<PortRange>() {
            Ok(range) => Some(range),
            Err(e) => {
                if !token.trim().is_empty() {
                    debug!(token = token.trim(), error = %e, "dropping port token");
                }
                None
            }
        });

        let spec = Self::from_ranges(ranges);
        if spec.is_empty() {
            Self::default_range()
        } else {
            spec
        }
    }

    /// All ports in ascending order.
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Number of distinct ports.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn contains(&self, port: Port) -> bool {
        self.ports.binary_search(&port).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.ports.iter().copied()
    }

    /// Collapse the set back into maximal contiguous ranges.
    pub fn ranges(&self) -> Vec<PortRange> {
        let mut out: Vec<PortRange> = Vec::new();
        for &port in &self.ports {
            match out.last_mut() {
                Some(last) if last.end.0.checked_add(1) == Some(port.0) => last.end = port,
                _ => out.push(PortRange::single(port)),
            }
        }
        out
    }
}

impl FromStr for PortSpec {
    type Err = PortError;

    /// Strict parsing: any malformed token is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortError::Empty);
        }

        let ranges = s
            .split(',')
            .map(str::parse::<PortRange>)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_ranges(ranges))
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ranges().iter().map(|r| r.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}
