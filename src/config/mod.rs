//! Configuration management for hostscan.
//!
//! Provides XDG-compliant paths and the settings file the engine
//! configuration is derived from.

mod settings;

pub use settings::{AppSettings, Paths};
