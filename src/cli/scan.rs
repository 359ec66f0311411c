//! Scan subcommand implementation.
//!
//! Handles the `hostscan scan <target>` command for port scanning.

use crate::cli::{Context, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output;
use crate::scanner::{EngineConfig, ScanEngine, MAX_WORKERS};
use crate::storage::ScanRecord;
use crate::types::{PortSpec, ScanRequest};
use clap::Parser;
use std::time::Duration;

/// Scan a target for open ports.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Target to scan (IP address or hostname)
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Ports to scan (e.g., "80", "80,443", "1-1000", "22,80,443,8000-9000").
    /// Malformed entries are ignored; if nothing valid remains, 1-1000 is used.
    #[arg(short, long)]
    pub ports: Option<String>,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Maximum number of concurrent probes (1-50)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Connection timeout per probe in milliseconds
    #[arg(short = 't', long)]
    pub timeout: Option<u64>,

    /// Don't save the scan report
    #[arg(long)]
    pub no_save: bool,
}

impl ScanCommand {
    /// Execute the scan command.
    pub async fn execute(&self, ctx: &Context) -> CliResult<()> {
        let settings = &ctx.settings;
        let format = self.output.unwrap_or(settings.default_output_format);
        let request = ScanRequest::new(
            &self.target,
            self.ports.as_deref().unwrap_or(&settings.default_ports),
        );

        let config = self.engine_config(ctx)?;

        if !ctx.quiet && format == OutputFormat::Plain {
            let spec = PortSpec::parse_lenient(&request.port_range);
            output::print_scan_header(&request.target, &request.port_range, spec.len());
            if spec.len() > config.large_scan_threshold {
                output::print_warning(&format!(
                    "{} ports exceeds the real-scan limit of {}; showing an approximate report.",
                    spec.len(),
                    config.large_scan_threshold
                ));
            }
        }

        let engine = ScanEngine::new(config);
        let report = engine.scan(&request).await;
        let record = ScanRecord::new(request, report);

        if !self.no_save && settings.auto_save_scans {
            let store = ctx.store()?;
            store.save(&record)?;

            if !ctx.quiet {
                output::print_info(&format!("Scan saved as {}", record.id.short()));
            }
        }

        output::print_report(&record, format)?;

        if let Some(message) = &record.report.message {
            output::print_warning(message);
        }

        Ok(())
    }

    /// Settings overlaid with command-line flags.
    fn engine_config(&self, ctx: &Context) -> CliResult<EngineConfig> {
        let mut config = ctx
            .settings
            .engine_config()
            .with_progress(ctx.verbose && !ctx.quiet);

        if let Some(workers) = self.workers {
            if !(1..=MAX_WORKERS).contains(&workers) {
                return Err(CliError::Other(format!(
                    "--workers must be between 1 and {MAX_WORKERS}"
                )));
            }
            config = config.with_max_workers(workers);
        }

        if let Some(timeout_ms) = self.timeout {
            if timeout_ms == 0 {
                return Err(CliError::Other("--timeout must be at least 1 ms".to_string()));
            }
            config = config.with_probe_timeout(Duration::from_millis(timeout_ms));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppSettings, Paths};
    use crate::storage::ScanStore;
    use tempfile::TempDir;
    use tokio::net::TcpListener;

    fn context(dir: &TempDir) -> Context {
        Context {
            paths: Paths::new(dir.path().join("config"), dir.path().join("data")),
            settings: AppSettings::default(),
            verbose: false,
            quiet: true,
        }
    }

    fn command(target: &str, ports: &str) -> ScanCommand {
        ScanCommand {
            target: target.to_string(),
            ports: Some(ports.to_string()),
            output: Some(OutputFormat::Json),
            workers: None,
            timeout: None,
            no_save: false,
        }
    }

    #[test]
    fn test_flags_override_settings() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let cmd = ScanCommand {
            workers: Some(4),
            timeout: Some(250),
            ..command("127.0.0.1", "80")
        };

        let config = cmd.engine_config(&ctx).unwrap();
        assert_eq!(config.max_workers, 4);
        assert_eq!(config.probe_timeout, Duration::from_millis(250));
        assert_eq!(config.large_scan_threshold, 1000);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let dir = TempDir::new().unwrap();
        let cmd = ScanCommand {
            workers: Some(0),
            ..command("127.0.0.1", "80")
        };
        assert!(cmd.engine_config(&context(&dir)).is_err());
    }

    #[test]
    fn test_workers_above_cap_rejected() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        let too_many = ScanCommand {
            workers: Some(MAX_WORKERS + 1),
            ..command("127.0.0.1", "80")
        };
        assert!(too_many.engine_config(&ctx).is_err());

        let at_cap = ScanCommand {
            workers: Some(MAX_WORKERS),
            ..command("127.0.0.1", "80")
        };
        assert_eq!(at_cap.engine_config(&ctx).unwrap().max_workers, MAX_WORKERS);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_scan_saves_record() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        command("127.0.0.1", &port.to_string())
            .execute(&ctx)
            .await
            .unwrap();

        let records = ScanStore::open(ctx.paths.scans_dir()).unwrap().list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].report.open_ports.len(), 1);
        assert_eq!(records[0].report.open_ports[0].port.as_u16(), port);
    }

    #[tokio::test]
    async fn test_no_save_leaves_store_empty() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let cmd = ScanCommand {
            no_save: true,
            ..command("bad host!", "80")
        };

        cmd.execute(&ctx).await.unwrap();
        assert!(!ctx.paths.scans_dir().exists());
    }
}
