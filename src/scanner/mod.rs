//! Scanner module - the port scanning engine.
//!
//! [`ScanEngine::scan`] parses the port specification, asks the
//! [`ScanPolicy`] which path to take, and either runs the real scan
//! (resolve, probe under a bounded worker pool, aggregate) or hands the
//! request to the [`ApproximateScanner`]. Every outcome, including a failed
//! resolution, comes back as a [`ScanReport`].

pub mod aggregate;
pub mod fallback;
pub mod policy;
pub mod scheduler;
pub mod tcp;
pub mod traits;

use crate::types::{PortSpec, ScanReport, ScanRequest, TargetResolver};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub use aggregate::aggregate;
pub use fallback::{ApproximateScanner, DemoScanner};
pub use policy::{ScanPath, ScanPolicy, LARGE_SCAN_THRESHOLD};
pub use scheduler::{ProbeScheduler, MAX_WORKERS};
pub use tcp::TcpConnectProbe;
pub use traits::Probe;

/// Engine tuning, built once and handed to [`ScanEngine::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound on concurrent probes.
    pub max_workers: usize,
    /// Timeout for a single connect attempt.
    pub probe_timeout: Duration,
    /// Port count above which the approximate scanner answers instead.
    pub large_scan_threshold: usize,
    /// Draw a progress bar while probing.
    pub show_progress: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_workers: MAX_WORKERS,
            probe_timeout: TcpConnectProbe::DEFAULT_TIMEOUT,
            large_scan_threshold: LARGE_SCAN_THRESHOLD,
            show_progress: false,
        }
    }
}

impl EngineConfig {
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_large_scan_threshold(mut self, threshold: usize) -> Self {
        self.large_scan_threshold = threshold;
        self
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }
}

/// The port scanning engine.
///
/// Holds no per-scan state; one engine can serve any number of scans.
pub struct ScanEngine {
    config: EngineConfig,
    resolver: Arc<TargetResolver>,
    probe: Arc<dyn Probe>,
    fallback: Arc<dyn ApproximateScanner>,
}

impl ScanEngine {
    /// Create an engine using TCP connect probes and the demo scanner.
    pub fn new(config: EngineConfig) -> Self {
        let resolver = Arc::new(TargetResolver::new());
        Self {
            probe: Arc::new(TcpConnectProbe::new(config.probe_timeout)),
            fallback: Arc::new(DemoScanner::new(Arc::clone(&resolver))),
            resolver,
            config,
        }
    }

    /// Replace the probe implementation.
    pub fn with_probe(mut self, probe: Arc<dyn Probe>) -> Self {
        self.probe = probe;
        self
    }

    /// Replace the scanner used for oversized requests.
    pub fn with_fallback(mut self, fallback: Arc<dyn ApproximateScanner>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Run a scan. Never fails; problems are reported through the report's
    /// status.
    pub async fn scan(&self, request: &ScanRequest) -> ScanReport {
        let spec = PortSpec::parse_lenient(&request.port_range);
        let path = ScanPolicy::new(self.config.large_scan_threshold).choose(&spec);

        info!(
            host = %request.target,
            ports = spec.len(),
            %path,
            "starting port scan"
        );

        match path {
            ScanPath::Approximate => self.fallback.approximate(request).await.conform_to(&spec),
            ScanPath::Full => self.scan_ports(&request.target, &spec).await,
        }
    }

    /// Probe every port of `spec` on `target`. Only reached through `scan`,
    /// after the policy has chosen the full path.
    async fn scan_ports(&self, target: &str, spec: &PortSpec) -> ScanReport {
        let resolved = match self.resolver.resolve(target).await {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(host = target, error = %e, "target resolution failed");
                return ScanReport::failed("", spec.len(), e.to_string());
            }
        };

        let start = Instant::now();
        let outcomes = ProbeScheduler::new(self.config.max_workers)
            .with_progress(self.config.show_progress)
            .run(Arc::clone(&self.probe), resolved.ip, spec)
            .await;
        let report = aggregate(resolved.ip, outcomes, spec.len());

        info!(
            host = %resolved,
            open = report.open_ports.len(),
            scanned = report.total_ports_scanned,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scan complete"
        );

        report
    }
}

impl Default for ScanEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OpenPort, Port, ScanStatus};
    use async_trait::async_trait;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::net::TcpListener;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    /// Counts delegations and answers with an out-of-shape report.
    #[derive(Default)]
    struct CountingFallback {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ApproximateScanner for CountingFallback {
        async fn approximate(&self, _request: &ScanRequest) -> ScanReport {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let port = |n| OpenPort {
                port: Port::new(n).unwrap(),
                service: "x".to_string(),
            };
            ScanReport::completed("203.0.113.9", vec![port(9000), port(80), port(80)], 7)
        }
    }

    /// Open ports are the ones listed.
    struct FixedProbe(Vec<u16>);

    #[async_trait]
    impl Probe for FixedProbe {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn probe(&self, _target: IpAddr, port: Port) -> bool {
            self.0.contains(&port.as_u16())
        }
    }

    fn open_numbers(report: &ScanReport) -> Vec<u16> {
        report.open_ports.iter().map(|p| p.port.as_u16()).collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_scan_finds_listening_port() {
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let open = listener.local_addr().unwrap().port();

        let closed_listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let closed = closed_listener.local_addr().unwrap().port();
        drop(closed_listener);

        let engine = ScanEngine::new(EngineConfig::default());
        let request = ScanRequest::new("127.0.0.1", format!("{open},{closed}"));
        let report = engine.scan(&request).await;

        assert_eq!(report.status, ScanStatus::Completed);
        assert_eq!(report.target_ip, "127.0.0.1");
        assert_eq!(report.total_ports_scanned, 2);
        assert_eq!(open_numbers(&report), vec![open]);

        // Same network state, same answer
        let again = engine.scan(&request).await;
        assert_eq!(again.open_ports, report.open_ports);
    }

    #[tokio::test]
    async fn test_report_matches_probe_results() {
        let engine = ScanEngine::default()
            .with_probe(Arc::new(FixedProbe(vec![443, 22, 5000, 9999])));
        let report = engine
            .scan(&ScanRequest::new("192.0.2.10", "1-100,443,5000,bogus"))
            .await;

        assert_eq!(report.total_ports_scanned, 102);
        assert_eq!(open_numbers(&report), vec![22, 443, 5000]);
        assert_eq!(report.open_ports[0].service, "SSH");
        assert_eq!(report.open_ports[2].service, "Unknown");
    }

    #[tokio::test]
    async fn test_empty_range_scans_default_ports() {
        let engine = ScanEngine::default().with_probe(Arc::new(FixedProbe(vec![80])));
        let report = engine.scan(&ScanRequest::new("192.0.2.10", "")).await;

        assert_eq!(report.total_ports_scanned, 1000);
        assert_eq!(open_numbers(&report), vec![80]);
    }

    #[tokio::test]
    async fn test_unresolvable_target_reports_error() {
        let fallback = Arc::new(CountingFallback::default());
        let engine = ScanEngine::default()
            .with_probe(Arc::new(FixedProbe(vec![80])))
            .with_fallback(fallback.clone());

        let report = engine
            .scan(&ScanRequest::new("not a valid host!", "80"))
            .await;

        assert_eq!(report.status, ScanStatus::Error);
        assert!(report.open_ports.is_empty());
        assert!(report.message.is_some());
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_large_request_delegates_to_fallback() {
        let fallback = Arc::new(CountingFallback::default());
        let engine = ScanEngine::default()
            .with_probe(Arc::new(FixedProbe(vec![80])))
            .with_fallback(fallback.clone());

        let report = engine
            .scan(&ScanRequest::new("192.0.2.10", "1-2000"))
            .await;

        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.status, ScanStatus::Completed);
        assert_eq!(report.target_ip, "203.0.113.9");
        assert_eq!(report.total_ports_scanned, 2000);
        // Normalized: in range, unique, ascending
        assert_eq!(open_numbers(&report), vec![80]);
    }

    #[tokio::test]
    async fn test_default_fallback_keeps_report_shape() {
        let engine = ScanEngine::default();
        let report = engine
            .scan(&ScanRequest::new("198.51.100.7", "1-65535"))
            .await;

        assert_eq!(report.status, ScanStatus::Completed);
        assert_eq!(report.total_ports_scanned, 65535);
        let ports = open_numbers(&report);
        assert!(ports.windows(2).all(|w| w[0] < w[1]));
    }

    /// Tracks how many probes are in flight at once.
    #[derive(Default)]
    struct PeakProbe {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Probe for PeakProbe {
        fn name(&self) -> &'static str {
            "peak"
        }

        async fn probe(&self, _target: IpAddr, _port: Port) -> bool {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(2)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            false
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_oversized_worker_budget_is_capped() {
        let probe = Arc::new(PeakProbe::default());
        let engine = ScanEngine::new(EngineConfig::default().with_max_workers(100_000))
            .with_probe(probe.clone());

        let report = engine.scan(&ScanRequest::new("192.0.2.10", "1-1000")).await;

        assert_eq!(report.total_ports_scanned, 1000);
        let peak = probe.peak.load(Ordering::SeqCst);
        assert!(peak <= MAX_WORKERS, "peak concurrency {peak}");
    }

    #[tokio::test]
    async fn test_oversized_threshold_still_delegates() {
        let fallback = Arc::new(CountingFallback::default());
        let engine = ScanEngine::new(EngineConfig::default().with_large_scan_threshold(usize::MAX))
            .with_probe(Arc::new(FixedProbe(Vec::new())))
            .with_fallback(fallback.clone());

        engine.scan(&ScanRequest::new("192.0.2.10", "1-5000")).await;
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }
}
