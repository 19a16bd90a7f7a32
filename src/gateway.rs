//! Abstract collaborator interfaces.
//!
//! The core never talks to the network, the device's location service, or
//! the map application directly; the surrounding app injects implementations
//! of these traits. Tests inject mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;
use thiserror::Error;
use uuid::Uuid;

use crate::models::shipment::{GeoPoint, Shipment};

/// Which of the caller's hats a fetch is made under. A user can be a buyer
/// on one order and a shop owner or transporter on another, and the backend
/// buckets shipments accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum FetchScope {
    AsTransporter,
    AsBuyer,
    AsShopOwner,
}

impl fmt::Display for FetchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchScope::AsTransporter => write!(f, "as_transporter"),
            FetchScope::AsBuyer => write!(f, "as_buyer"),
            FetchScope::AsShopOwner => write!(f, "as_shop_owner"),
        }
    }
}

/// Failure reported by a collaborator. Transport-agnostic: the core does not
/// care whether the cause was a socket error or a rejected payload, only
/// which operation failed.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rejected by backend: {0}")]
    Rejected(String),

    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
}

/// Remote shipment operations.
#[async_trait]
pub trait ShipmentGateway: Send + Sync {
    /// Fetch the caller's shipments under one scope. Records arrive with
    /// whatever `raw_status` the backend holds; the core normalizes them.
    async fn fetch_shipments(&self, scope: FetchScope) -> Result<Vec<Shipment>, GatewayError>;

    /// Request a status change, expressed in the backend's own vocabulary.
    /// Success means the backend accepted the new status; the authoritative
    /// result is still whatever the next fetch returns.
    async fn update_shipment_status(
        &self,
        id: Uuid,
        target_raw_status: &str,
    ) -> Result<(), GatewayError>;

    /// Remove a completed shipment from the caller's history.
    async fn delete_shipment(&self, id: Uuid) -> Result<(), GatewayError>;
}

/// Device geolocation.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Current device position. May take arbitrarily long or fail outright;
    /// callers bound the wait and treat failure as non-fatal.
    async fn current_position(&self) -> Result<GeoPoint, GatewayError>;
}

/// Hand-off to the platform's map/navigation application.
pub trait NavigationOpener: Send + Sync {
    fn open(&self, origin: &str, destination: &str);
}
