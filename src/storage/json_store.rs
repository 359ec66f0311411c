//! JSON-based scan report storage.
//!
//! Stores each scan as a separate JSON file for simplicity and durability.
//! Supports listing, prefix lookup, and pruning of old records.

use crate::error::{StorageError, StorageResult};
use crate::types::{ScanId, ScanReport, ScanRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// A persisted scan: the request as given and the report it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Unique identifier for this scan.
    pub id: ScanId,
    /// Kind of scan; always `"port"` for records written by this crate.
    pub scan_type: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    pub request: ScanRequest,
    pub report: ScanReport,
}

impl ScanRecord {
    pub fn new(request: ScanRequest, report: ScanReport) -> Self {
        Self {
            id: ScanId::new(),
            scan_type: "port".to_string(),
            created_at: Utc::now(),
            request,
            report,
        }
    }

    /// Get a short summary of the scan.
    pub fn summary(&self) -> String {
        format!(
            "{} [{}] {} ({}) - {} open of {} scanned",
            self.id.short(),
            self.report.status,
            self.request.target,
            self.report.target_ip,
            self.report.open_ports.len(),
            self.report.total_ports_scanned
        )
    }
}

/// JSON file-based scan storage.
pub struct ScanStore {
    scans_dir: PathBuf,
}

impl ScanStore {
    /// Open (and create if needed) a store rooted at `scans_dir`.
    pub fn open(scans_dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let scans_dir = scans_dir.into();
        fs::create_dir_all(&scans_dir)
            .map_err(|e| StorageError::DirectoryError(e.to_string()))?;

        Ok(Self { scans_dir })
    }

    /// Save a scan record.
    pub fn save(&self, record: &ScanRecord) -> StorageResult<()> {
        let file = self.scan_file(&record.id);
        let content = serde_json::to_string_pretty(record)?;

        fs::write(&file, content).map_err(|e| StorageError::SaveFailed(e.to_string()))?;
        debug!(id = %record.id, path = %file.display(), "saved scan record");
        Ok(())
    }

    /// Load a scan record by ID.
    pub fn load(&self, id: &ScanId) -> StorageResult<ScanRecord> {
        let file = self.scan_file(id);

        if !file.exists() {
            return Err(StorageError::ScanNotFound(id.to_string()));
        }

        let content =
            fs::read_to_string(&file).map_err(|e| StorageError::LoadFailed(e.to_string()))?;

        serde_json::from_str(&content).map_err(|e| StorageError::LoadFailed(e.to_string()))
    }

    /// Find a scan by ID prefix.
    pub fn find_by_prefix(&self, prefix: &str) -> StorageResult<ScanRecord> {
        let prefix = prefix.to_lowercase();
        let matches: Vec<_> = self
            .list_ids()?
            .into_iter()
            .filter(|id| id.to_string().starts_with(&prefix))
            .collect();

        match matches.as_slice() {
            [] => Err(StorageError::ScanNotFound(prefix)),
            [id] => self.load(id),
            _ => Err(StorageError::AmbiguousPrefix {
                prefix,
                matches: matches.len(),
            }),
        }
    }

    /// Look up by full ID or by prefix.
    pub fn find(&self, id_or_prefix: &str) -> StorageResult<ScanRecord> {
        match id_or_prefix.parse::<ScanId>() {
            Ok(id) => self.load(&id),
            Err(_) => self.find_by_prefix(id_or_prefix),
        }
    }

    /// List all scan IDs.
    pub fn list_ids(&self) -> StorageResult<Vec<ScanId>> {
        let mut ids = Vec::new();

        for entry in
            fs::read_dir(&self.scans_dir).map_err(|e| StorageError::DirectoryError(e.to_string()))?
        {
            let entry = entry.map_err(|e| StorageError::DirectoryError(e.to_string()))?;
            let path = entry.path();

            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem() {
                    if let Ok(id) = stem.to_string_lossy().parse::<ScanId>() {
                        ids.push(id);
                    }
                }
            }
        }

        Ok(ids)
    }

    /// List all scan records, most recent first. Unreadable files are skipped.
    pub fn list(&self) -> StorageResult<Vec<ScanRecord>> {
        let mut records = Vec::new();

        for id in self.list_ids()? {
            match self.load(&id) {
                Ok(record) => records.push(record),
                Err(e) => warn!(%id, error = %e, "skipping unreadable scan record"),
            }
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    /// List recent scans (last n).
    pub fn list_recent(&self, count: usize) -> StorageResult<Vec<ScanRecord>> {
        let mut records = self.list()?;
        records.truncate(count);
        Ok(records)
    }

    /// Delete a scan record.
    pub fn delete(&self, id: &ScanId) -> StorageResult<()> {
        let file = self.scan_file(id);

        if !file.exists() {
            return Err(StorageError::ScanNotFound(id.to_string()));
        }

        fs::remove_file(&file).map_err(|e| StorageError::SaveFailed(e.to_string()))
    }

    /// Delete scans older than a given age. Returns how many were removed.
    pub fn cleanup(&self, max_age: chrono::Duration) -> StorageResult<usize> {
        let cutoff = Utc::now() - max_age;
        let mut deleted = 0;

        for record in self.list()? {
            if record.created_at < cutoff {
                self.delete(&record.id)?;
                deleted += 1;
            }
        }

        Ok(deleted)
    }

    /// Delete every stored scan. Returns how many were removed.
    pub fn clear(&self) -> StorageResult<usize> {
        let ids = self.list_ids()?;
        for id in &ids {
            self.delete(id)?;
        }
        Ok(ids.len())
    }

    /// Get the file path for a scan.
    fn scan_file(&self, id: &ScanId) -> PathBuf {
        self.scans_dir.join(format!("{}.json", id))
    }
}
