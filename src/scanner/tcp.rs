//! TCP connect probe.
//!
//! Performs a full TCP handshake using the operating system's socket API and
//! closes the connection immediately. No data is exchanged.

use crate::error::{ScanError, ScanResult};
use crate::scanner::traits::Probe;
use crate::types::Port;
use async_trait::async_trait;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// TCP connect probe with a fixed per-attempt timeout.
///
/// Does not require elevated privileges.
#[derive(Debug, Clone)]
pub struct TcpConnectProbe {
    timeout: Duration,
}

impl TcpConnectProbe {
    /// Default per-attempt timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Attempt to connect to the target address.
    async fn attempt_connect(&self, addr: SocketAddr) -> ScanResult<TcpStream> {
        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(classify(addr, e)),
            Err(_) => Err(ScanError::Timeout),
        }
    }
}

impl Default for TcpConnectProbe {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT)
    }
}

fn classify(addr: SocketAddr, e: io::Error) -> ScanError {
    match e.kind() {
        io::ErrorKind::ConnectionRefused => ScanError::ConnectionRefused,
        io::ErrorKind::TimedOut => ScanError::Timeout,
        _ => {
            let message = e.to_string();
            let lower = message.to_lowercase();
            if lower.contains("host") && lower.contains("unreachable") {
                ScanError::HostUnreachable
            } else if lower.contains("unreachable") {
                ScanError::NetworkUnreachable(message)
            } else {
                ScanError::ConnectionFailed {
                    target: addr.ip().to_string(),
                    port: addr.port(),
                    reason: message,
                }
            }
        }
    }
}

#[async_trait]
impl Probe for TcpConnectProbe {
    fn name(&self) -> &'static str {
        "tcp-connect"
    }

    async fn probe(&self, target: IpAddr, port: Port) -> bool {
        let addr = SocketAddr::new(target, port.as_u16());

        match self.attempt_connect(addr).await {
            Ok(stream) => {
                drop(stream);
                true
            }
            Err(e) => {
                trace!(%addr, error = %e, "probe failed");
                false
            }
        }
    }
}
