//! CLI subcommand definitions and handlers.
//!
//! Implements a git-like subcommand architecture:
//! - `hostscan scan <target>` - Scan a target
//! - `hostscan history` - View saved scans
//! - `hostscan export <scan-id>` - Export a saved scan

mod export;
mod history;
mod scan;

pub use export::ExportCommand;
pub use history::HistoryCommand;
pub use scan::ScanCommand;

use crate::config::{AppSettings, Paths};
use crate::error::CliResult;
use crate::storage::ScanStore;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// hostscan - a concurrent TCP connect port scanner.
///
/// Probes a bounded set of TCP ports on one host with a fixed worker budget
/// and keeps a history of scan reports.
#[derive(Parser, Debug)]
#[command(name = "hostscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concurrent TCP connect port scanner", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a settings file
    #[arg(long, global = true, value_name = "PATH", env = "HOSTSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for saved scans
    #[arg(long, global = true, value_name = "DIR", env = "HOSTSCAN_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a target for open ports
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// View scan history
    #[command(alias = "h")]
    History(HistoryCommand),

    /// Export a saved scan
    #[command(alias = "e")]
    Export(ExportCommand),
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Everything a command handler needs, resolved once from global flags.
#[derive(Debug, Clone)]
pub struct Context {
    pub paths: Paths,
    pub settings: AppSettings,
    pub verbose: bool,
    pub quiet: bool,
}

impl Context {
    /// Resolve paths and load settings for the given global flags.
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let mut paths = Paths::discover()?;
        if let Some(dir) = &cli.data_dir {
            paths = paths.with_data_dir(dir);
        }

        let settings = match &cli.config {
            Some(path) => AppSettings::load_from(path)?,
            None => AppSettings::load(&paths)?,
        };

        Ok(Self {
            paths,
            settings,
            verbose: cli.verbose,
            quiet: cli.quiet,
        })
    }

    pub fn store(&self) -> CliResult<ScanStore> {
        Ok(ScanStore::open(self.paths.scans_dir())?)
    }
}

impl Cli {
    /// Dispatch to the selected subcommand.
    pub async fn run(self, ctx: &Context) -> CliResult<()> {
        match &self.command {
            Commands::Scan(cmd) => cmd.execute(ctx).await,
            Commands::History(cmd) => cmd.execute(ctx),
            Commands::Export(cmd) => cmd.execute(ctx),
        }
    }
}
