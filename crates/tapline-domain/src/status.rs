//! Lifecycle status enums
//!
//! All three enums serialize to their display strings so cached data,
//! backups, and backend payloads stay human-readable and interoperate
//! across client versions.

use serde::{Deserialize, Serialize};

/// Survey feasibility verdict for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feasibility {
    Feasible,
    #[serde(rename = "Not Feasible")]
    NotFeasible,
    #[serde(rename = "Low Lying")]
    LowLying,
}

impl Feasibility {
    pub fn label(&self) -> &'static str {
        match self {
            Feasibility::Feasible => "Feasible",
            Feasibility::NotFeasible => "Not Feasible",
            Feasibility::LowLying => "Low Lying",
        }
    }
}

impl Default for Feasibility {
    fn default() -> Self {
        Feasibility::Feasible
    }
}

/// Progress of the main connection works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorksStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    Ongoing,
    Completed,
    Claimed,
    Certified,
}

impl WorksStatus {
    pub fn label(&self) -> &'static str {
        match self {
            WorksStatus::NotStarted => "Not Started",
            WorksStatus::Ongoing => "Ongoing",
            WorksStatus::Completed => "Completed",
            WorksStatus::Claimed => "Claimed",
            WorksStatus::Certified => "Certified",
        }
    }
}

impl Default for WorksStatus {
    fn default() -> Self {
        WorksStatus::NotStarted
    }
}

/// Progress of over-budget works, which are claimed and paid separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverbudgetStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    Ongoing,
    Completed,
    Claimed,
    Paid,
}

impl OverbudgetStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OverbudgetStatus::NotStarted => "Not Started",
            OverbudgetStatus::Ongoing => "Ongoing",
            OverbudgetStatus::Completed => "Completed",
            OverbudgetStatus::Claimed => "Claimed",
            OverbudgetStatus::Paid => "Paid",
        }
    }
}

impl Default for OverbudgetStatus {
    fn default() -> Self {
        OverbudgetStatus::NotStarted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feasibility_wire_strings() {
        assert_eq!(
            serde_json::to_string(&Feasibility::NotFeasible).unwrap(),
            "\"Not Feasible\""
        );
        let back: Feasibility = serde_json::from_str("\"Low Lying\"").unwrap();
        assert_eq!(back, Feasibility::LowLying);
    }

    #[test]
    fn works_status_wire_strings() {
        assert_eq!(
            serde_json::to_string(&WorksStatus::NotStarted).unwrap(),
            "\"Not Started\""
        );
        let back: WorksStatus = serde_json::from_str("\"Certified\"").unwrap();
        assert_eq!(back, WorksStatus::Certified);
    }

    #[test]
    fn overbudget_ends_in_paid() {
        let back: OverbudgetStatus = serde_json::from_str("\"Paid\"").unwrap();
        assert_eq!(back, OverbudgetStatus::Paid);
        assert!(serde_json::from_str::<OverbudgetStatus>("\"Certified\"").is_err());
    }
}
