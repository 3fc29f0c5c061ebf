//! Record store and state synchronization for the tapline suite
//!
//! This crate owns the record and activity-log collections and everything
//! that moves them around:
//! - `RecordStore`: the in-memory collections and their CRUD operations
//! - `LocalCache`: durable JSON mirror used as a fallback cache
//! - `RemoteClient`: the shared backend document (feature `native`)
//! - `Synchronizer`: broadcast/receive between views plus backend sync
//! - Backup export/import, CSV bulk import, and SpreadsheetML export

pub mod backup;
pub mod cache;
pub mod csv_import;
#[cfg(feature = "native")]
pub mod remote;
pub mod shared_state;
pub mod spreadsheet;
pub mod store;
pub mod sync;

pub use backup::{
    backup_file_name, backup_to_json, export_backup, import_backup, BackupFile, ImportError,
    BACKUP_EXTENSION, BACKUP_VERSION,
};
pub use cache::{CacheError, JsonFileCache, LocalCache};
pub use csv_import::{import_csv, CsvError, CsvImport};
#[cfg(feature = "native")]
pub use remote::{RemoteClient, RemoteError};
pub use shared_state::SharedState;
pub use spreadsheet::{export_workbook, sanitize_sheet_name, workbook_file_name, ExportError};
pub use store::{RecordFilter, RecordStore, StoreError};
pub use sync::{SaveOutcome, Synchronizer};
