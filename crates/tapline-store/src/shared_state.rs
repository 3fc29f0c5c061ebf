//! The shared backend document

use serde::{Deserialize, Serialize};
use tapline_domain::{ActivityEntry, ConnectionRecord};

/// The whole-application state as exchanged with the remote backend: both
/// collections travel together, always wholesale. The backend holds a
/// single shared document with no locking or versioning; concurrent saves
/// are last-write-wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedState {
    pub records: Vec<ConnectionRecord>,
    pub activities: Vec<ActivityEntry>,
}

impl SharedState {
    pub fn new(records: Vec<ConnectionRecord>, activities: Vec<ActivityEntry>) -> Self {
        Self {
            records,
            activities,
        }
    }

    /// A payload is well-formed only when both collections are present;
    /// an empty JSON object deserializes to a default state which callers
    /// treat as "no shared data yet".
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.activities.is_empty()
    }
}
