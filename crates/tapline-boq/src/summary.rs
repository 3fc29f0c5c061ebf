//! Portfolio roll-ups across a set of records

use tapline_domain::{ConnectionRecord, Feasibility, OverbudgetStatus, Totals, WorksStatus};

/// Per-batch progress counters and financial roll-up.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSummary {
    pub list_no: String,
    pub total: usize,
    pub surveyed: usize,
    pub feasible: usize,
    pub with_drawings: usize,
    pub estimated: usize,
    pub totals: Totals,
}

/// One slice of a status breakdown: how many records sit in a lifecycle
/// stage and the money tied up there.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSlice {
    pub label: &'static str,
    pub count: usize,
    pub amount: f64,
}

/// Summarize records batch by batch, in first-seen order.
pub fn list_summaries(records: &[ConnectionRecord]) -> Vec<ListSummary> {
    let mut summaries: Vec<ListSummary> = Vec::new();
    for rec in records {
        let idx = match summaries.iter().position(|s| s.list_no == rec.list_no) {
            Some(i) => i,
            None => {
                summaries.push(ListSummary {
                    list_no: rec.list_no.clone(),
                    total: 0,
                    surveyed: 0,
                    feasible: 0,
                    with_drawings: 0,
                    estimated: 0,
                    totals: Totals::default(),
                });
                summaries.len() - 1
            }
        };
        let summary = &mut summaries[idx];
        summary.total += 1;
        if !rec.survey_date.is_empty() {
            summary.surveyed += 1;
        }
        if rec.feasible == Feasibility::Feasible {
            summary.feasible += 1;
        }
        if !rec.drawings.is_empty() {
            summary.with_drawings += 1;
        }
        if rec.totals.est > 0.0 {
            summary.estimated += 1;
        }
        summary.totals.accumulate(&rec.totals);
    }
    summaries
}

/// Main-works pipeline: record counts per stage with the value at stake.
/// Early stages are measured by estimate, completed work by its claim,
/// certified work by its certified value.
pub fn works_breakdown(records: &[ConnectionRecord]) -> Vec<StatusSlice> {
    let slice = |label, status: WorksStatus, pick: fn(&Totals) -> f64| {
        let matching = records.iter().filter(|r| r.works_status == status);
        let (count, amount) = matching.fold((0, 0.0), |(c, a), r| (c + 1, a + pick(&r.totals)));
        StatusSlice {
            label,
            count,
            amount,
        }
    };
    vec![
        slice("Not Started", WorksStatus::NotStarted, |t| t.est),
        slice("Ongoing", WorksStatus::Ongoing, |t| t.est),
        slice("Completed", WorksStatus::Completed, |t| t.claim),
        slice("Certified", WorksStatus::Certified, |t| t.cert),
    ]
}

/// Over-budget pipeline: every stage is measured by the over-budget value.
pub fn overbudget_breakdown(records: &[ConnectionRecord]) -> Vec<StatusSlice> {
    let slice = |label, status: OverbudgetStatus| {
        let matching = records.iter().filter(|r| r.overbudget_status == status);
        let (count, amount) = matching.fold((0, 0.0), |(c, a), r| (c + 1, a + r.totals.over));
        StatusSlice {
            label,
            count,
            amount,
        }
    };
    vec![
        slice("Not Started", OverbudgetStatus::NotStarted),
        slice("Ongoing", OverbudgetStatus::Ongoing),
        slice("Completed", OverbudgetStatus::Completed),
        slice("Paid", OverbudgetStatus::Paid),
    ]
}

/// Grand financial roll-up across all records.
pub fn portfolio_totals(records: &[ConnectionRecord]) -> Totals {
    let mut sum = Totals::default();
    for rec in records {
        sum.accumulate(&rec.totals);
    }
    sum
}
