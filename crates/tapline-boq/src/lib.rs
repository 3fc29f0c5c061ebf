//! BOQ schedule and financial aggregation
//!
//! This crate provides the bill-of-quantities core of the tapline suite:
//! - A static master schedule of billable items with unit rates
//! - A safe arithmetic evaluator for free-text quantity expressions
//! - Per-record totals recomputation and portfolio roll-ups

pub mod eval;
pub mod schedule;
pub mod summary;
pub mod totals;

pub use eval::{evaluate, Evaluation};
pub use schedule::{filter_schedule, find_item, master_schedule, BoqMasterItem, RowKind, Section};
pub use summary::{
    list_summaries, overbudget_breakdown, portfolio_totals, works_breakdown, ListSummary,
    StatusSlice,
};
pub use totals::{apply_quantity, compute_totals, item_amount};
