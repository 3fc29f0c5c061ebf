//! Durable local cache
//!
//! A JSON mirror of the two collections plus the logged-in user, used as
//! the fallback when the remote backend is unreachable. Reads never fail
//! outward: a missing or corrupt entry is logged and treated as empty,
//! matching the "fall back to empty collections" contract.

use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tapline_domain::{ActivityEntry, ConnectionRecord, User};
use tracing::warn;

use crate::shared_state::SharedState;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String-keyed durable storage for the collections and the session user.
pub trait LocalCache {
    /// Load the cached records; empty on missing or corrupt data.
    fn load_records(&self) -> Vec<ConnectionRecord>;
    /// Load the cached activity log; empty on missing or corrupt data.
    fn load_activities(&self) -> Vec<ActivityEntry>;
    /// Mirror both collections.
    fn store_state(&self, state: &SharedState) -> Result<(), CacheError>;
    /// The persisted login session, if any.
    fn load_session(&self) -> Option<User>;
    fn store_session(&self, user: &User) -> Result<(), CacheError>;
    fn clear_session(&self) -> Result<(), CacheError>;
}

/// File-per-entry JSON cache rooted at a directory.
pub struct JsonFileCache {
    dir: PathBuf,
}

impl JsonFileCache {
    const RECORDS: &'static str = "records.json";
    const ACTIVITIES: &'static str = "activities.json";
    const SESSION: &'static str = "session.json";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, entry: &str) -> PathBuf {
        self.dir.join(entry)
    }

    fn read_entry<T: DeserializeOwned>(&self, entry: &str) -> Option<T> {
        let path = self.path(entry);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(entry, error = %err, "failed to read cache entry");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(entry, error = %err, "malformed cache entry ignored");
                None
            }
        }
    }

    fn write_entry<T: Serialize>(&self, entry: &str, value: &T) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;
        let text = serde_json::to_string(value)?;
        fs::write(self.path(entry), text)?;
        Ok(())
    }

    fn remove_entry(&self, entry: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.path(entry)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

impl LocalCache for JsonFileCache {
    fn load_records(&self) -> Vec<ConnectionRecord> {
        self.read_entry(Self::RECORDS).unwrap_or_default()
    }

    fn load_activities(&self) -> Vec<ActivityEntry> {
        self.read_entry(Self::ACTIVITIES).unwrap_or_default()
    }

    fn store_state(&self, state: &SharedState) -> Result<(), CacheError> {
        self.write_entry(Self::RECORDS, &state.records)?;
        self.write_entry(Self::ACTIVITIES, &state.activities)
    }

    fn load_session(&self) -> Option<User> {
        self.read_entry(Self::SESSION)
    }

    fn store_session(&self, user: &User) -> Result<(), CacheError> {
        self.write_entry(Self::SESSION, user)
    }

    fn clear_session(&self) -> Result<(), CacheError> {
        self.remove_entry(Self::SESSION)
    }
}
