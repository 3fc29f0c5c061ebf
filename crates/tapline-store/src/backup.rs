//! Backup file export and import
//!
//! A backup is a single JSON document carrying both collections plus
//! provenance, written with an `.hcf` extension. Import merges by record
//! id, so restoring the same file twice is a no-op.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tapline_domain::{merge_activities, ActivityEntry, ConnectionRecord};
use tracing::info;

use crate::shared_state::SharedState;

/// Format version written into every backup. Readers accept any version;
/// the field exists for forward diagnostics, not gating.
pub const BACKUP_VERSION: &str = "2.5";

/// Suggested extension for backup files.
pub const BACKUP_EXTENSION: &str = "hcf";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupFile {
    pub version: String,
    pub timestamp: String,
    #[serde(rename = "exportedBy")]
    pub exported_by: String,
    pub records: Vec<ConnectionRecord>,
    #[serde(default)]
    pub logs: Vec<ActivityEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Invalid backup file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid backup file: no record collection")]
    MissingRecords,
}

/// Snapshot the current state into a backup document.
pub fn export_backup(state: &SharedState, exported_by: &str) -> BackupFile {
    BackupFile {
        version: BACKUP_VERSION.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        exported_by: exported_by.to_string(),
        records: state.records.clone(),
        logs: state.activities.clone(),
    }
}

/// Serialize a backup to the JSON text written to disk.
pub fn backup_to_json(backup: &BackupFile) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(backup)
}

/// Default filename for a backup taken now, e.g.
/// `tapline_backup_2026-08-26.hcf`.
pub fn backup_file_name() -> String {
    format!(
        "tapline_backup_{}.{}",
        Utc::now().format("%Y-%m-%d"),
        BACKUP_EXTENSION
    )
}

/// Parse backup JSON and merge it into the current state.
///
/// Records merge by id: an imported record replaces the local record with
/// the same id, imported records come first, and local records absent
/// from the backup are kept. Imported log entries are prepended ahead of
/// the local log, subject to the retention cap.
pub fn import_backup(state: &mut SharedState, json: &str) -> Result<usize, ImportError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.get("records").map_or(false, |r| r.is_array()) {
        return Err(ImportError::MissingRecords);
    }
    let backup: BackupFile = serde_json::from_value(value)?;

    let imported = backup.records.len();
    let mut merged = backup.records;
    for existing in state.records.drain(..) {
        if !merged.iter().any(|r| r.id == existing.id) {
            merged.push(existing);
        }
    }
    state.records = merged;
    merge_activities(&mut state.activities, backup.logs);

    info!(
        imported,
        total = state.records.len(),
        version = %backup.version,
        "merged backup into workspace"
    );
    Ok(imported)
}
