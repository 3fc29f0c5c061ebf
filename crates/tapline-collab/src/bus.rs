//! Publish/subscribe sync channel
//!
//! Views announce record mutations and presence pings on a shared channel
//! scoped to one application instance. The trait keeps the transport
//! abstract: `LocalBus` fans out in-process, and a network pub/sub channel
//! can implement the same interface for multi-client deployments.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tapline_domain::{ActivityEntry, ConnectionRecord, User};

/// Messages exchanged between views. The envelope serializes as
/// `{"type": ..., "payload": ...}` so network transports can route on
/// the tag without decoding the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum BusMessage {
    /// Full replacement collections after a local mutation.
    #[serde(rename = "DATA_UPDATE")]
    DataUpdate {
        records: Vec<ConnectionRecord>,
        activities: Vec<ActivityEntry>,
    },
    /// Periodic presence announcement from a logged-in view.
    #[serde(rename = "USER_PING")]
    UserPing(User),
}

/// A pub/sub channel carrying [`BusMessage`]s between views.
///
/// Messages are delivered to every subscriber in the order they were
/// published. Delivery is fire-and-forget: a publisher never learns
/// whether anyone was listening.
pub trait SyncBus: Send + Sync {
    fn publish(&self, message: BusMessage);
    fn subscribe(&self) -> Receiver<BusMessage>;
}

/// In-process bus for single-process deployments: each subscriber gets an
/// mpsc channel and `publish` clones the message to all of them.
#[derive(Default)]
pub struct LocalBus {
    subscribers: Mutex<Vec<Sender<BusMessage>>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SyncBus for LocalBus {
    fn publish(&self, message: BusMessage) {
        let mut subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Dropped receivers fall out of the list on the next publish.
        subscribers.retain(|tx| tx.send(message.clone()).is_ok());
    }

    fn subscribe(&self) -> Receiver<BusMessage> {
        let (tx, rx) = channel();
        let mut subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        subscribers.push(tx);
        rx
    }
}
