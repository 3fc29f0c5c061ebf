//! Per-record financial aggregation

use std::collections::HashMap;

use tapline_domain::{BoqItemValues, ConnectionRecord, Totals, TrackedColumn};

use crate::eval::{evaluate, Evaluation};
use crate::schedule::master_schedule;

/// Recompute the four column totals from scratch.
///
/// Sums `value * rate` over every billable master row with a stored entry;
/// rows absent from the map count as zero. A full recompute on each change
/// keeps the totals from drifting against the expression values.
pub fn compute_totals(boq: &HashMap<String, BoqItemValues>) -> Totals {
    let mut totals = Totals::default();
    for master in master_schedule() {
        let Some(rate) = master.rate.filter(|_| master.is_billable()) else {
            continue;
        };
        let Some(values) = boq.get(master.bill) else {
            continue;
        };
        for column in TrackedColumn::ALL {
            totals.add(column, values.value(column) * rate);
        }
    }
    totals
}

/// Amount contributed by one item row in one column.
pub fn item_amount(bill: &str, values: &BoqItemValues, column: TrackedColumn) -> f64 {
    let rate = crate::schedule::find_item(bill)
        .filter(|m| m.is_billable())
        .and_then(|m| m.rate)
        .unwrap_or(0.0);
    values.value(column) * rate
}

/// Record a quantity expression against one bill item and column.
///
/// The expression text is stored unconditionally; the numeric value is
/// overwritten only when evaluation succeeds. Totals are recomputed
/// wholesale afterwards. Returns the evaluation so callers can log it.
pub fn apply_quantity(
    record: &mut ConnectionRecord,
    bill: &str,
    column: TrackedColumn,
    expr: &str,
) -> Evaluation {
    let evaluation = evaluate(expr);

    let values = record.boq.entry(bill.to_string()).or_default();
    values.set_expression(column, expr);
    if evaluation.ok {
        values.set_value(column, evaluation.value);
    }

    record.totals = compute_totals(&record.boq);
    evaluation
}
