//! Target resolution.
//!
//! A scan target is either a literal IP address (IPv4 or IPv6) or a hostname.
//! Literals resolve to themselves; hostnames go through the system resolver
//! configuration. Resolution happens once per scan and is never retried.

use std::fmt;
use std::net::IpAddr;
use tracing::{debug, warn};
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// A scan target that has been resolved to an IP address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedTarget {
    /// The original input (hostname or IP string).
    pub original: String,
    /// The resolved IP address.
    pub ip: IpAddr,
}

impl ResolvedTarget {
    pub fn new(original: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            original: original.into(),
            ip,
        }
    }
}

impl fmt::Display for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.original == self.ip.to_string() {
            write!(f, "{}", self.ip)
        } else {
            write!(f, "{} ({})", self.original, self.ip)
        }
    }
}

/// Error type for target parsing and resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("invalid hostname or IP address: {0}")]
    InvalidFormat(String),
    #[error("failed to resolve hostname '{0}': {1}")]
    DnsResolutionFailed(String, String),
    #[error("no IP addresses found for hostname '{0}'")]
    NoAddressesFound(String),
}

/// Resolves host identifiers to addresses.
///
/// Holds a DNS resolver built from the system configuration, falling back to
/// the library defaults when `/etc/resolv.conf` cannot be read.
pub struct TargetResolver {
    resolver: TokioAsyncResolver,
}

impl TargetResolver {
    pub fn new() -> Self {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
            warn!(error = %e, "system resolver configuration unavailable, using defaults");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Self { resolver }
    }

    /// Resolve a target string to a single address.
    ///
    /// IPv4 answers are preferred over IPv6; within a family the first answer
    /// wins.
    pub async fn resolve(&self, target: &str) -> Result<ResolvedTarget, TargetError> {
        let target = target.trim();

        if let Ok(ip) = target.parse::<IpAddr>() {
            return Ok(ResolvedTarget::new(target, ip));
        }

        if !is_valid_hostname(target) {
            return Err(TargetError::InvalidFormat(target.to_string()));
        }

        let response = self
            .resolver
            .lookup_ip(target)
            .await
            .map_err(|e| TargetError::DnsResolutionFailed(target.to_string(), e.to_string()))?;

        let ips: Vec<IpAddr> = response.iter().collect();
        let ip = ips
            .iter()
            .find(|ip| ip.is_ipv4())
            .or_else(|| ips.first())
            .copied()
            .ok_or_else(|| TargetError::NoAddressesFound(target.to_string()))?;

        debug!(host = target, %ip, candidates = ips.len(), "resolved target");
        Ok(ResolvedTarget::new(target, ip))
    }
}

impl Default for TargetResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a string is a valid hostname.
fn is_valid_hostname(s: &str) -> bool {
    let s = s.strip_suffix('.').unwrap_or(s);
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    // Each label must be 1-63 characters
    for label in s.split('.') {
        if label.is_empty() || label.len() > 63 {
            return false;
        }
        // Must start and end with alphanumeric
        if !label.chars().next().is_some_and(|c| c.is_ascii_alphanumeric()) {
            return false;
        }
        if !label.chars().last().is_some_and(|c| c.is_ascii_alphanumeric()) {
            return false;
        }
        // Can only contain alphanumeric and hyphens
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return false;
        }
    }

    true
}
