//! Core event channel.
//!
//! Screens that observe rather than poll (badge counters, toasts) subscribe
//! to the receive side; the coordinator announces transitions, deletions,
//! and list refreshes. Delivery is best-effort and never blocks a mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

use crate::models::shipment::CanonicalStatus;

/// Things the coordinator announces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ShipmentTransitioned {
        shipment_id: Uuid,
        from: CanonicalStatus,
        to: CanonicalStatus,
        timestamp: DateTime<Utc>,
    },
    ShipmentDeleted {
        shipment_id: Uuid,
        timestamp: DateTime<Utc>,
    },
    ShipmentListRefreshed {
        total: usize,
        timestamp: DateTime<Utc>,
    },
}

/// Sending half of the core event channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Send an event. A full or closed channel only logs; observers are
    /// optional and must never fail a mutation.
    pub fn send(&self, event: Event) {
        if let Err(err) = self.sender.try_send(event) {
            warn!(error = %err, "dropping core event, no listener keeping up");
        }
    }
}

/// Create the core event channel with the given capacity.
pub fn channel(capacity: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSender::new(tx), rx)
}
