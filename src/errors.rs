use thiserror::Error;
use uuid::Uuid;

use crate::gateway::GatewayError;
use crate::models::shipment::CanonicalStatus;

/// Errors surfaced by the coordination core.
///
/// `UpdateFailed`, `FetchFailed`, and `DeleteFailed` are the user-visible
/// ones: the screen shows a dismissible message and keeps its last-known
/// state. `PermissionDenied` and `InvalidTransition` indicate the caller
/// offered an action the permission evaluator would never have permitted; a
/// correctly wired screen cannot produce them.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("a transition is already in flight for shipment {0}")]
    TransitionInFlight(Uuid),

    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        from: CanonicalStatus,
        to: CanonicalStatus,
    },

    #[error("status update failed: {0}")]
    UpdateFailed(#[source] GatewayError),

    #[error("shipment fetch failed: {0}")]
    FetchFailed(#[source] GatewayError),

    #[error("shipment delete failed: {0}")]
    DeleteFailed(#[source] GatewayError),

    #[error("shipment {0} is not completed")]
    NotCompleted(Uuid),

    #[error("result discarded after invalidation")]
    Cancelled,
}

impl CoreError {
    /// Whether a screen should show this error to the end user. Everything
    /// else is a programming or wiring defect and belongs in logs only.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            CoreError::UpdateFailed(_) | CoreError::FetchFailed(_) | CoreError::DeleteFailed(_)
        )
    }
}
