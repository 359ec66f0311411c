//! Probe trait abstraction.
//!
//! The scheduler only needs "is this port open?" answers; keeping that behind
//! a trait lets tests drive the worker pool without touching the network.

use crate::types::Port;
use async_trait::async_trait;
use std::net::IpAddr;

/// A single bounded-time reachability check against `(address, port)`.
///
/// Implementations never fail: every error condition is reported as a closed
/// port.
///
/// # Example
///
/// ```ignore
/// use hostscan::scanner::{Probe, TcpConnectProbe};
///
/// let probe = TcpConnectProbe::new(Duration::from_secs(1));
/// let open = probe.probe(ip, Port::new(22).unwrap()).await;
/// ```
#[async_trait]
pub trait Probe: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Probe one port, returning `true` if it is open.
    async fn probe(&self, target: IpAddr, port: Port) -> bool;
}
