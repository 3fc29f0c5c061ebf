//! In-memory record store
//!
//! The store is the exclusive owner of the record and activity-log
//! collections; the synchronizer reads and replaces them wholesale, never
//! patching individual fields across the sync boundary.

use tapline_boq::{apply_quantity, Evaluation};
use tapline_domain::{
    push_activity, ActivityEntry, ConnectionRecord, Feasibility, TrackedColumn, User,
};

use crate::shared_state::SharedState;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Criteria for the register view: free-text search over reference,
/// surname, and address, plus batch and feasibility filters.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub search: String,
    pub list_no: Option<String>,
    pub feasibility: Option<Feasibility>,
}

impl RecordFilter {
    fn matches(&self, rec: &ConnectionRecord) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || rec.reference.to_lowercase().contains(&needle)
            || rec.surname.to_lowercase().contains(&needle)
            || rec.address.to_lowercase().contains(&needle);
        let matches_list = self
            .list_no
            .as_ref()
            .map_or(true, |list| rec.list_no == *list);
        let matches_feasibility = self.feasibility.map_or(true, |f| rec.feasible == f);
        matches_search && matches_list && matches_feasibility
    }
}

/// Owner of the record and activity collections.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<ConnectionRecord>,
    activities: Vec<ActivityEntry>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: SharedState) -> Self {
        Self {
            records: state.records,
            activities: state.activities,
        }
    }

    /// Snapshot both collections for persistence or broadcast.
    pub fn to_state(&self) -> SharedState {
        SharedState::new(self.records.clone(), self.activities.clone())
    }

    /// Replace both collections wholesale (receive side of a sync).
    pub fn replace_all(&mut self, state: SharedState) {
        self.records = state.records;
        self.activities = state.activities;
    }

    pub fn records(&self) -> &[ConnectionRecord] {
        &self.records
    }

    pub fn activities(&self) -> &[ActivityEntry] {
        &self.activities
    }

    pub fn get(&self, id: &str) -> Option<&ConnectionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn by_reference(&self, reference: &str) -> Option<&ConnectionRecord> {
        self.records.iter().find(|r| r.reference == reference)
    }

    /// Append an audit entry (newest first, capped).
    pub fn log(&mut self, user: &User, action: impl Into<String>, target: Option<String>) {
        let mut entry = ActivityEntry::new(&user.username, action);
        entry.target_ref = target;
        push_activity(&mut self.activities, entry);
    }

    /// Create a blank record at the front of the register.
    pub fn create(&mut self, list_no: &str, user: &User) -> String {
        let list = if list_no.trim().is_empty() {
            "New List"
        } else {
            list_no
        };
        let record = ConnectionRecord::new(list);
        let id = record.id.clone();
        self.records.insert(0, record);
        self.log(user, "created new record in list", Some(list.to_string()));
        id
    }

    /// Insert records produced by a bulk import at the front, preserving
    /// their order.
    pub fn insert_batch(&mut self, records: Vec<ConnectionRecord>) {
        for record in records.into_iter().rev() {
            self.records.insert(0, record);
        }
    }

    /// Apply an edit to one record, stamping it and logging the action.
    pub fn update_with(
        &mut self,
        id: &str,
        user: &User,
        action: &str,
        edit: impl FnOnce(&mut ConnectionRecord),
    ) -> Result<(), StoreError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        edit(record);
        record.touch(&user.username);
        let target = if record.reference.is_empty() {
            record.id.clone()
        } else {
            record.reference.clone()
        };
        self.log(user, action, Some(target));
        Ok(())
    }

    /// Record a quantity expression against a connection selected by
    /// reference. The expression text is always stored; the value and the
    /// record totals only move on successful evaluation.
    pub fn record_quantity(
        &mut self,
        reference: &str,
        bill: &str,
        column: TrackedColumn,
        expr: &str,
        user: &User,
    ) -> Result<Evaluation, StoreError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.reference == reference)
            .ok_or_else(|| StoreError::NotFound(reference.to_string()))?;
        let evaluation = apply_quantity(record, bill, column, expr);
        record.touch(&user.username);
        self.log(
            user,
            format!("adjusted {} qty for {} on", column.key(), bill),
            Some(reference.to_string()),
        );
        Ok(evaluation)
    }

    /// Delete is destructive and irreversible; callers are expected to
    /// have confirmed with the user first.
    pub fn delete(&mut self, id: &str, user: &User) -> Result<ConnectionRecord, StoreError> {
        let idx = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = self.records.remove(idx);
        let target = if removed.reference.is_empty() {
            removed.id.clone()
        } else {
            removed.reference.clone()
        };
        self.log(user, "permanently deleted record", Some(target));
        Ok(removed)
    }

    pub fn filter(&self, filter: &RecordFilter) -> Vec<&ConnectionRecord> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }

    /// Unique batch names, sorted.
    pub fn batch_lists(&self) -> Vec<String> {
        let mut lists: Vec<String> = self.records.iter().map(|r| r.list_no.clone()).collect();
        lists.sort();
        lists.dedup();
        lists
    }

    /// Records eligible for BOQ entry and spreadsheet export: only those
    /// carrying a reference code.
    pub fn referenced_records(&self) -> Vec<&ConnectionRecord> {
        self.records.iter().filter(|r| r.has_reference()).collect()
    }
}
