//! Per-item quantity entries and the derived financial totals

use serde::{Deserialize, Serialize};

/// The four financial tracking columns of the BOQ schedule, in costing
/// lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackedColumn {
    Estimate,
    OverBudget,
    Claim,
    Certified,
}

impl TrackedColumn {
    pub const ALL: [TrackedColumn; 4] = [
        TrackedColumn::Estimate,
        TrackedColumn::OverBudget,
        TrackedColumn::Claim,
        TrackedColumn::Certified,
    ];

    /// Short key used in activity-log messages and column headers.
    pub fn key(&self) -> &'static str {
        match self {
            TrackedColumn::Estimate => "est",
            TrackedColumn::OverBudget => "over",
            TrackedColumn::Claim => "claim",
            TrackedColumn::Certified => "cert",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrackedColumn::Estimate => "Estimate",
            TrackedColumn::OverBudget => "Over Budget",
            TrackedColumn::Claim => "Claimed",
            TrackedColumn::Certified => "Certified",
        }
    }
}

/// Raw expression text and last successfully evaluated value for each
/// tracked column of one bill item.
///
/// The value half of a pair only changes when its expression evaluates
/// successfully; an invalid expression keeps the prior value while the new
/// text is still stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoqItemValues {
    pub est_expr: String,
    pub est_val: f64,
    pub over_expr: String,
    pub over_val: f64,
    pub claim_expr: String,
    pub claim_val: f64,
    pub cert_expr: String,
    pub cert_val: f64,
}

impl BoqItemValues {
    pub fn expression(&self, column: TrackedColumn) -> &str {
        match column {
            TrackedColumn::Estimate => &self.est_expr,
            TrackedColumn::OverBudget => &self.over_expr,
            TrackedColumn::Claim => &self.claim_expr,
            TrackedColumn::Certified => &self.cert_expr,
        }
    }

    pub fn value(&self, column: TrackedColumn) -> f64 {
        match column {
            TrackedColumn::Estimate => self.est_val,
            TrackedColumn::OverBudget => self.over_val,
            TrackedColumn::Claim => self.claim_val,
            TrackedColumn::Certified => self.cert_val,
        }
    }

    pub fn set_expression(&mut self, column: TrackedColumn, expr: impl Into<String>) {
        match column {
            TrackedColumn::Estimate => self.est_expr = expr.into(),
            TrackedColumn::OverBudget => self.over_expr = expr.into(),
            TrackedColumn::Claim => self.claim_expr = expr.into(),
            TrackedColumn::Certified => self.cert_expr = expr.into(),
        }
    }

    pub fn set_value(&mut self, column: TrackedColumn, value: f64) {
        match column {
            TrackedColumn::Estimate => self.est_val = value,
            TrackedColumn::OverBudget => self.over_val = value,
            TrackedColumn::Claim => self.claim_val = value,
            TrackedColumn::Certified => self.cert_val = value,
        }
    }
}

/// Financial roll-up of a record's BOQ schedule.
///
/// Always derivable from the record's `boq` map and the master rate table;
/// never the source of truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Totals {
    pub est: f64,
    pub over: f64,
    pub claim: f64,
    pub cert: f64,
}

impl Totals {
    pub fn get(&self, column: TrackedColumn) -> f64 {
        match column {
            TrackedColumn::Estimate => self.est,
            TrackedColumn::OverBudget => self.over,
            TrackedColumn::Claim => self.claim,
            TrackedColumn::Certified => self.cert,
        }
    }

    pub fn add(&mut self, column: TrackedColumn, amount: f64) {
        match column {
            TrackedColumn::Estimate => self.est += amount,
            TrackedColumn::OverBudget => self.over += amount,
            TrackedColumn::Claim => self.claim += amount,
            TrackedColumn::Certified => self.cert += amount,
        }
    }

    /// Sum another roll-up into this one (portfolio aggregation).
    pub fn accumulate(&mut self, other: &Totals) {
        self.est += other.est;
        self.over += other.over;
        self.claim += other.claim;
        self.cert += other.cert;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_values_wire_field_names() {
        let mut values = BoqItemValues::default();
        values.set_expression(TrackedColumn::Estimate, "3*4");
        values.set_value(TrackedColumn::Estimate, 12.0);

        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(json["estExpr"], "3*4");
        assert_eq!(json["estVal"], 12.0);
        assert_eq!(json["certExpr"], "");
    }

    #[test]
    fn item_values_partial_payload_defaults() {
        let values: BoqItemValues =
            serde_json::from_str(r#"{"claimExpr":"2+2","claimVal":4}"#).unwrap();
        assert_eq!(values.value(TrackedColumn::Claim), 4.0);
        assert_eq!(values.value(TrackedColumn::Estimate), 0.0);
    }

    #[test]
    fn column_accessors_round_trip() {
        let mut values = BoqItemValues::default();
        for (i, column) in TrackedColumn::ALL.into_iter().enumerate() {
            values.set_value(column, i as f64 + 1.0);
        }
        assert_eq!(values.value(TrackedColumn::Estimate), 1.0);
        assert_eq!(values.value(TrackedColumn::Certified), 4.0);
    }

    #[test]
    fn totals_accumulate() {
        let mut sum = Totals::default();
        sum.accumulate(&Totals {
            est: 10.0,
            over: 1.0,
            claim: 2.0,
            cert: 3.0,
        });
        sum.accumulate(&Totals {
            est: 5.0,
            ..Totals::default()
        });
        assert_eq!(sum.est, 15.0);
        assert_eq!(sum.cert, 3.0);
    }
}
