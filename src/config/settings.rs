//! Application settings and paths.
//!
//! Manages XDG-compliant paths for configuration and data, and the JSON
//! settings file the engine configuration is built from.

use crate::cli::OutputFormat;
use crate::error::{ConfigError, ConfigResult};
use crate::scanner::{EngineConfig, LARGE_SCAN_THRESHOLD, MAX_WORKERS};
use crate::types::PortSpec;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application directory paths following the XDG Base Directory Specification.
///
/// Built once at startup and passed to whatever needs it.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/hostscan)
    pub config_dir: PathBuf,
    /// Data directory (~/.local/share/hostscan)
    pub data_dir: PathBuf,
}

impl Paths {
    /// Locate the platform directories for hostscan.
    pub fn discover() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("com", "hostscan", "hostscan").ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
            data_dir: project.data_dir().to_path_buf(),
        })
    }

    /// Use explicit directories (tests, `--data-dir`).
    pub fn new(config_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            data_dir: data_dir.into(),
        }
    }

    /// Override the data directory.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    /// Get the path to the scans storage directory.
    pub fn scans_dir(&self) -> PathBuf {
        self.data_dir.join("scans")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Maximum number of concurrent probes.
    pub max_workers: usize,
    /// Per-probe connect timeout in milliseconds.
    pub probe_timeout_ms: u64,
    /// Port count above which the approximate scanner is used.
    pub large_scan_threshold: usize,
    /// Port specification used when none is given on the command line.
    pub default_ports: String,
    /// Default output format.
    pub default_output_format: OutputFormat,
    /// Persist every scan report.
    pub auto_save_scans: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            max_workers: MAX_WORKERS,
            probe_timeout_ms: 1000,
            large_scan_threshold: LARGE_SCAN_THRESHOLD,
            default_ports: "1-1000".to_string(),
            default_output_format: OutputFormat::Plain,
            auto_save_scans: true,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, falling back to defaults
    /// when no settings file exists.
    pub fn load(paths: &Paths) -> ConfigResult<Self> {
        let file = paths.settings_file();

        if !file.exists() {
            debug!(path = %file.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=MAX_WORKERS).contains(&self.max_workers) {
            return Err(ConfigError::InvalidValue {
                field: "max_workers",
                reason: format!("must be between 1 and {MAX_WORKERS}"),
            });
        }
        if self.large_scan_threshold > LARGE_SCAN_THRESHOLD {
            return Err(ConfigError::InvalidValue {
                field: "large_scan_threshold",
                reason: format!("must be at most {LARGE_SCAN_THRESHOLD}"),
            });
        }
        if let Err(e) = self.default_ports.parse::<PortSpec>() {
            return Err(ConfigError::InvalidValue {
                field: "default_ports",
                reason: e.to_string(),
            });
        }
        if self.probe_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "probe_timeout_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Build the engine configuration these settings describe.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_max_workers(self.max_workers)
            .with_probe_timeout(Duration::from_millis(self.probe_timeout_ms))
            .with_large_scan_threshold(self.large_scan_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.max_workers, 50);
        assert_eq!(settings.probe_timeout_ms, 1000);
        assert_eq!(settings.large_scan_threshold, 1000);
        assert_eq!(settings.engine_config(), EngineConfig::default());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let paths = Paths::new(dir.path().join("config"), dir.path().join("data"));
        assert_eq!(AppSettings::load(&paths).unwrap(), AppSettings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let paths = Paths::new(dir.path(), dir.path());
        fs::write(
            paths.settings_file(),
            r#"{"max_workers": 8, "default_output_format": "json"}"#,
        )
        .unwrap();

        let settings = AppSettings::load(&paths).unwrap();
        assert_eq!(settings.max_workers, 8);
        assert_eq!(settings.default_output_format, OutputFormat::Json);
        assert_eq!(settings.probe_timeout_ms, 1000);
        assert_eq!(settings.engine_config().max_workers, 8);
    }

    #[test]
    fn test_written_settings_reload() {
        let dir = TempDir::new().unwrap();
        let paths = Paths::new(dir.path(), dir.path());
        let settings = AppSettings {
            large_scan_threshold: 200,
            ..AppSettings::default()
        };

        fs::write(paths.settings_file(), serde_json::to_string_pretty(&settings).unwrap()).unwrap();
        assert_eq!(AppSettings::load(&paths).unwrap(), settings);
    }

    #[test]
    fn test_rejects_zero_workers() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("settings.json");
        fs::write(&file, r#"{"max_workers": 0}"#).unwrap();

        assert!(matches!(
            AppSettings::load_from(&file),
            Err(ConfigError::InvalidValue { field: "max_workers", .. })
        ));
    }

    #[test]
    fn test_rejects_limits_above_engine_caps() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("settings.json");

        fs::write(&file, r#"{"max_workers": 100000}"#).unwrap();
        assert!(matches!(
            AppSettings::load_from(&file),
            Err(ConfigError::InvalidValue { field: "max_workers", .. })
        ));

        fs::write(&file, r#"{"large_scan_threshold": 70000}"#).unwrap();
        assert!(matches!(
            AppSettings::load_from(&file),
            Err(ConfigError::InvalidValue { field: "large_scan_threshold", .. })
        ));

        fs::write(&file, r#"{"max_workers": 50, "large_scan_threshold": 1000}"#).unwrap();
        assert!(AppSettings::load_from(&file).is_ok());
    }

    #[test]
    fn test_rejects_malformed_default_ports() {
        let settings = AppSettings {
            default_ports: "22,http".to_string(),
            ..AppSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { field: "default_ports", .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("settings.json");
        fs::write(&file, "{not json").unwrap();

        assert!(matches!(
            AppSettings::load_from(&file),
            Err(ConfigError::InvalidFormat(_))
        ));
    }
}
