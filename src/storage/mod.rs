//! Scan report persistence.
//!
//! Provides JSON-based storage for scan records with query capabilities.

mod json_store;

pub use json_store::{ScanRecord, ScanStore};
