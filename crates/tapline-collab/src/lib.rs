//! Shared collaboration infrastructure for the tapline suite.
//!
//! This crate provides the primitives that keep concurrent views of the
//! register eventually consistent:
//! - A publish/subscribe sync bus abstraction with an in-process
//!   implementation, decoupled from any browser primitive
//! - Presence awareness with liveness-based pruning
//! - A session lifecycle context owning the bus subscription and timers

pub mod bus;
pub mod presence;
pub mod session;

pub use bus::{BusMessage, LocalBus, SyncBus};
pub use presence::{liveness_timeout, PresenceEntry, PresenceRoster, PING_INTERVAL};
pub use session::{
    IncomingUpdate, SessionContext, SessionError, SessionState, SYNC_FLASH_LOCAL,
    SYNC_FLASH_REMOTE,
};
