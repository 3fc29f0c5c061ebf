//! Connection record domain model

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    Attachment, BoqItemValues, Feasibility, OverbudgetStatus, Totals, WorksStatus,
};

/// One house-connection project: survey identity, contact details, status
/// lifecycle, attached documentation, and the BOQ quantity schedule.
///
/// `totals` is a derived cache of `boq` against the master rate table and
/// is never edited independently; `tapline-boq` recomputes it on every
/// quantity change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionRecord {
    pub id: String,
    /// Intake batch the record belongs to.
    pub list_no: String,
    /// Connection reference code, e.g. `HC/101`. May be empty for
    /// freshly created rows.
    pub reference: String,
    pub surname: String,
    pub name: String,
    pub phone1: String,
    pub phone2: String,
    pub address: String,
    pub location: String,
    pub survey_date: String,
    pub feasible: Feasibility,
    pub works_status: WorksStatus,
    pub overbudget_status: OverbudgetStatus,
    pub reason: String,
    pub photos: Vec<Attachment>,
    pub drawings: Vec<Attachment>,
    /// Bill code -> recorded quantities for that item.
    pub boq: HashMap<String, BoqItemValues>,
    pub totals: Totals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<String>,
}

impl Default for ConnectionRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            list_no: String::new(),
            reference: String::new(),
            surname: String::new(),
            name: String::new(),
            phone1: String::new(),
            phone2: String::new(),
            address: String::new(),
            location: String::new(),
            survey_date: String::new(),
            feasible: Feasibility::default(),
            works_status: WorksStatus::default(),
            overbudget_status: OverbudgetStatus::default(),
            reason: String::new(),
            photos: Vec::new(),
            drawings: Vec::new(),
            boq: HashMap::new(),
            totals: Totals::default(),
            last_modified_by: None,
            last_modified_at: None,
        }
    }
}

impl ConnectionRecord {
    /// Create a blank record in the given batch, surveyed today.
    pub fn new(list_no: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            list_no: list_no.into(),
            survey_date: Utc::now().format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    /// Whether the record carries a reference code. Records without one
    /// are excluded from BOQ selection and export lists.
    pub fn has_reference(&self) -> bool {
        !self.reference.trim().is_empty()
    }

    /// Display name of the stakeholder, `SURNAME Firstname`.
    pub fn stakeholder(&self) -> String {
        format!("{} {}", self.surname, self.name).trim().to_string()
    }

    pub fn attachment_count(&self) -> usize {
        self.photos.len() + self.drawings.len()
    }

    /// Stamp the record with the user and time of its latest mutation.
    pub fn touch(&mut self, username: &str) {
        self.last_modified_by = Some(username.to_string());
        self.last_modified_at = Some(Utc::now().to_rfc3339());
    }
}
