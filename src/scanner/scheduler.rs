//! Bounded worker pool that runs probes.
//!
//! `W = min(max_workers, |ports|)` tasks share an atomic cursor into an
//! immutable port slice. `fetch_add` hands every index to exactly one worker,
//! and outcomes flow back over a single channel whose only consumer is the
//! scheduler. Nothing else is shared between workers.

use crate::scanner::traits::Probe;
use crate::types::{Port, PortSpec, ProbeOutcome};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

/// Upper bound on concurrent probes (and therefore open sockets).
pub const MAX_WORKERS: usize = 50;

/// Runs probes for every port of a [`PortSpec`] under a fixed worker budget.
#[derive(Debug, Clone)]
pub struct ProbeScheduler {
    max_workers: usize,
    show_progress: bool,
}

impl ProbeScheduler {
    /// Budgets outside `1..=MAX_WORKERS` are clamped into it.
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.clamp(1, MAX_WORKERS),
            show_progress: false,
        }
    }

    /// Draw a progress bar on stderr while probing.
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Number of workers used for `port_count` ports.
    pub fn worker_count(&self, port_count: usize) -> usize {
        self.max_workers.min(port_count)
    }

    /// Probe every port in `spec` against `target`.
    ///
    /// Returns exactly one outcome per port, in no particular order. Only
    /// returns once every worker has finished.
    pub async fn run(
        &self,
        probe: Arc<dyn Probe>,
        target: IpAddr,
        spec: &PortSpec,
    ) -> Vec<ProbeOutcome> {
        let ports: Arc<[Port]> = spec.ports().into();
        let total = ports.len();
        let workers = self.worker_count(total);
        if workers == 0 {
            return Vec::new();
        }

        debug!(host = %target, ports = total, workers, probe = probe.name(), "starting probe workers");

        let cursor = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::unbounded_channel::<ProbeOutcome>();
        let progress = self.show_progress.then(|| progress_bar(total));

        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let ports = Arc::clone(&ports);
                let cursor = Arc::clone(&cursor);
                let probe = Arc::clone(&probe);
                let tx = tx.clone();
                let progress = progress.clone();

                tokio::spawn(async move {
                    let mut checked = 0usize;
                    while let Some(&port) = ports.get(cursor.fetch_add(1, Ordering::Relaxed)) {
                        let open = probe.probe(target, port).await;
                        checked += 1;

                        if let Some(pb) = &progress {
                            pb.inc(1);
                            if open {
                                pb.set_message(format!("Found open port: {}", port));
                            }
                        }

                        if tx.send(ProbeOutcome::new(port, open)).is_err() {
                            break;
                        }
                    }
                    trace!(worker, checked, "worker finished");
                })
            })
            .collect();

        // Only the workers hold senders now, so the channel closes when they finish
        drop(tx);

        for joined in join_all(handles).await {
            if let Err(e) = joined {
                warn!(error = %e, "probe worker terminated abnormally");
            }
        }

        let mut outcomes = Vec::with_capacity(total);
        while let Some(outcome) = rx.recv().await {
            outcomes.push(outcome);
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        if outcomes.len() < total {
            fill_missing(&mut outcomes, &ports);
        }

        outcomes
    }
}

impl Default for ProbeScheduler {
    fn default() -> Self {
        Self::new(MAX_WORKERS)
    }
}

/// Record ports that no worker reported (a worker panicked mid-probe) as
/// closed, keeping one outcome per port.
fn fill_missing(outcomes: &mut Vec<ProbeOutcome>, ports: &[Port]) {
    let reported: HashSet<Port> = outcomes.iter().map(|o| o.port).collect();
    let missing: Vec<Port> = ports
        .iter()
        .copied()
        .filter(|p| !reported.contains(p))
        .collect();

    warn!(missing = missing.len(), "recording unreported ports as closed");
    outcomes.extend(missing.into_iter().map(|p| ProbeOutcome::new(p, false)));
}

fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    )
    .map(|s| s.progress_chars("=>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::net::Ipv4Addr;
    use std::sync::Mutex;
    use std::time::Duration;

    const TARGET: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));

    /// Records every probe and reports even ports as open.
    #[derive(Default)]
    struct RecordingProbe {
        calls: Mutex<HashMap<u16, usize>>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Probe for RecordingProbe {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn probe(&self, _target: IpAddr, port: Port) -> bool {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(1)).await;
            *self.calls.lock().unwrap().entry(port.as_u16()).or_default() += 1;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            port.as_u16() % 2 == 0
        }
    }

    struct PanickingProbe;

    #[async_trait]
    impl Probe for PanickingProbe {
        fn name(&self) -> &'static str {
            "panicking"
        }

        async fn probe(&self, _target: IpAddr, port: Port) -> bool {
            if port.as_u16() == 7 {
                panic!("probe blew up");
            }
            true
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_port_probed_exactly_once() {
        let spec = PortSpec::parse_lenient("1-257");

        for max_workers in [1, 3, 50, 500] {
            let probe = Arc::new(RecordingProbe::default());
            let outcomes = ProbeScheduler::new(max_workers)
                .run(probe.clone(), TARGET, &spec)
                .await;

            assert_eq!(outcomes.len(), 257, "workers={max_workers}");

            let unique: HashSet<Port> = outcomes.iter().map(|o| o.port).collect();
            assert_eq!(unique.len(), 257);

            let calls = probe.calls.lock().unwrap();
            assert_eq!(calls.len(), 257);
            assert!(calls.values().all(|&n| n == 1));

            for outcome in &outcomes {
                assert_eq!(outcome.open, outcome.port.as_u16() % 2 == 0);
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_bounded_by_workers() {
        let spec = PortSpec::parse_lenient("1000-1199");
        let probe = Arc::new(RecordingProbe::default());

        ProbeScheduler::new(8).run(probe.clone(), TARGET, &spec).await;

        let peak = probe.peak.load(Ordering::SeqCst);
        assert!(peak <= 8, "peak concurrency {peak}");
        assert!(peak >= 1);
    }

    #[test]
    fn test_worker_count() {
        let scheduler = ProbeScheduler::default();
        assert_eq!(scheduler.worker_count(3), 3);
        assert_eq!(scheduler.worker_count(1000), MAX_WORKERS);
        assert_eq!(ProbeScheduler::new(0).worker_count(10), 1);
        assert_eq!(ProbeScheduler::new(10_000).worker_count(1000), MAX_WORKERS);
    }

    #[tokio::test]
    async fn test_panicking_worker_keeps_outcomes_complete() {
        let spec = PortSpec::parse_lenient("1-20");
        let outcomes = ProbeScheduler::new(4)
            .run(Arc::new(PanickingProbe), TARGET, &spec)
            .await;

        assert_eq!(outcomes.len(), 20);
        let seven = outcomes.iter().find(|o| o.port.as_u16() == 7).unwrap();
        assert!(!seven.open);
        assert_eq!(outcomes.iter().filter(|o| o.open).count(), 19);
    }
}
