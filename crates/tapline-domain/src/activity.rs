//! Append-only activity log

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Maximum number of retained activity entries; older entries are evicted.
pub const ACTIVITY_LOG_CAP: usize = 100;

/// One audit-trail entry. Entries are prepended on every mutating action,
/// so the newest entry is always first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: String,
    pub user: String,
    pub action: String,
    pub timestamp: String,
    #[serde(rename = "targetRef", skip_serializing_if = "Option::is_none")]
    pub target_ref: Option<String>,
}

impl ActivityEntry {
    /// Create an entry stamped with the current time.
    pub fn new(user: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user: user.into(),
            action: action.into(),
            timestamp: Utc::now().to_rfc3339(),
            target_ref: None,
        }
    }

    pub fn with_target(mut self, target_ref: impl Into<String>) -> Self {
        self.target_ref = Some(target_ref.into());
        self
    }
}

/// Prepend an entry and evict anything beyond the retention cap.
pub fn push_activity(log: &mut Vec<ActivityEntry>, entry: ActivityEntry) {
    log.insert(0, entry);
    log.truncate(ACTIVITY_LOG_CAP);
}

/// Prepend a batch of imported entries ahead of the current log, then cap.
pub fn merge_activities(log: &mut Vec<ActivityEntry>, imported: Vec<ActivityEntry>) {
    let mut merged = imported;
    merged.append(log);
    merged.truncate(ACTIVITY_LOG_CAP);
    *log = merged;
}
