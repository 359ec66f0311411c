//! # hostscan - concurrent TCP connect port scanning
//!
//! hostscan resolves a target, expands a port specification into a bounded,
//! deduplicated set of ports, probes them with full TCP connects under a
//! fixed worker budget and per-probe timeout, and returns a sorted report of
//! open ports with inferred service names.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use hostscan::scanner::{EngineConfig, ScanEngine};
//! use hostscan::types::ScanRequest;
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = ScanEngine::new(EngineConfig::default());
//!     let report = engine.scan(&ScanRequest::new("127.0.0.1", "22,80,8000-8100")).await;
//!
//!     for open in &report.open_ports {
//!         println!("{} {}", open.port, open.service);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - ports, port specifications, target resolution, report shapes
//! - [`scanner`] - the engine: policy, probe scheduler, aggregation, fallback
//! - [`services`] - well-known port labels
//! - [`config`] - settings file and directories
//! - [`storage`] - saved scan records
//! - [`output`] - plain, JSON and CSV rendering
//! - [`cli`] - command-line front end
//! - [`error`] - error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod services;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ScanError};
pub use scanner::{EngineConfig, ScanEngine};
pub use types::{Port, PortSpec, ScanReport, ScanRequest, ScanStatus};
