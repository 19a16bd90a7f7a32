//! Shipment lifecycle state machine.
//!
//! Transporter-fulfilled shipments move `Pending -> Collecting -> InProgress
//! -> Completed`; self-pickup shipments jump `Pending -> Completed` directly,
//! since the transporter-only middle states are unreachable without a
//! transporter. `Completed` is terminal.
//!
//! Every transition is two-phase: the screen shows
//! [`TransitionKind::confirmation_prompt`], and only on confirmation does the
//! coordinator push the target status to the backend and re-fetch. Nothing
//! here mutates a shipment locally; the re-fetched `raw_status` is the only
//! source of truth.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::errors::CoreError;
use crate::models::shipment::{CanonicalStatus, Shipment};

/// A user-triggerable forward step in the shipment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Transporter departs toward the farmer.
    StartPickup,
    /// Transporter confirms the goods are collected from the farmer.
    ConfirmCollected,
    /// Transporter confirms the goods are handed to the buyer.
    ConfirmDelivered,
    /// Buyer, farmer, or shop owner confirms a direct hand-off.
    MarkSelfCollected,
}

impl TransitionKind {
    /// The canonical state this transition leaves.
    pub fn source(&self) -> CanonicalStatus {
        match self {
            TransitionKind::StartPickup => CanonicalStatus::Pending,
            TransitionKind::ConfirmCollected => CanonicalStatus::Collecting,
            TransitionKind::ConfirmDelivered => CanonicalStatus::InProgress,
            TransitionKind::MarkSelfCollected => CanonicalStatus::Pending,
        }
    }

    /// The canonical state this transition enters.
    pub fn target(&self) -> CanonicalStatus {
        match self {
            TransitionKind::StartPickup => CanonicalStatus::Collecting,
            TransitionKind::ConfirmCollected => CanonicalStatus::InProgress,
            TransitionKind::ConfirmDelivered => CanonicalStatus::Completed,
            TransitionKind::MarkSelfCollected => CanonicalStatus::Completed,
        }
    }

    /// Whether only the assigned transporter may trigger this step.
    pub fn is_transporter_only(&self) -> bool {
        !matches!(self, TransitionKind::MarkSelfCollected)
    }

    /// Whether this step is structurally available on the given shipment:
    /// the shipment sits in the source state and a transporter is assigned
    /// (or absent, for the self-pickup step). Says nothing about who may
    /// trigger it; that is the permission evaluator's job.
    pub fn applies_to(&self, shipment: &Shipment) -> bool {
        shipment.canonical_status == self.source()
            && (self.is_transporter_only() != shipment.is_self_pickup())
    }

    /// Phase-one confirmation text shown before anything is sent.
    pub fn confirmation_prompt(&self, shipment: &Shipment) -> String {
        match self {
            TransitionKind::StartPickup => format!(
                "Start pickup for order {}? The farmer will be notified that you are on the way.",
                shipment.external_order_id
            ),
            TransitionKind::ConfirmCollected => format!(
                "Confirm you have collected {} from {}?",
                shipment.product.name, shipment.farmer.name
            ),
            TransitionKind::ConfirmDelivered => format!(
                "Confirm you have handed {} to {}?",
                shipment.product.name, shipment.buyer.name
            ),
            TransitionKind::MarkSelfCollected => format!(
                "Mark order {} as collected? This completes the shipment.",
                shipment.external_order_id
            ),
        }
    }
}

/// The natural next step for a shipment, if any. `Completed` shipments have
/// none.
pub fn next_transition(shipment: &Shipment) -> Option<TransitionKind> {
    let kind = match (shipment.canonical_status, shipment.is_self_pickup()) {
        (CanonicalStatus::Pending, false) => TransitionKind::StartPickup,
        (CanonicalStatus::Collecting, false) => TransitionKind::ConfirmCollected,
        (CanonicalStatus::InProgress, false) => TransitionKind::ConfirmDelivered,
        (CanonicalStatus::Pending, true) => TransitionKind::MarkSelfCollected,
        _ => return None,
    };
    Some(kind)
}

/// Guard against a backward or out-of-terminal request. Transitions are
/// monotonic in the lifecycle ordering; no component may request one that
/// goes backward or leaves `Completed`.
pub fn ensure_forward(from: CanonicalStatus, to: CanonicalStatus) -> Result<(), CoreError> {
    if from.is_terminal() || to <= from {
        return Err(CoreError::InvalidTransition { from, to });
    }
    Ok(())
}
