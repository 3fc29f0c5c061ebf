//! Domain types shared across the tapline suite
//!
//! This crate provides the canonical domain models for house-connection
//! record management:
//! - ConnectionRecord: one surveyed house connection with its BOQ schedule
//! - Feasibility, WorksStatus, OverbudgetStatus: lifecycle status enums
//! - BoqItemValues, Totals, TrackedColumn: per-item quantities and the
//!   derived financial roll-up
//! - Attachment: photo/drawing file metadata
//! - ActivityEntry: append-only audit log entries
//! - User: session identity

pub mod activity;
pub mod attachment;
pub mod currency;
pub mod quantities;
pub mod record;
pub mod status;
pub mod user;

pub use activity::*;
pub use attachment::*;
pub use currency::*;
pub use quantities::*;
pub use record::*;
pub use status::*;
pub use user::*;
