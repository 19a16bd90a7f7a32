use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::shipment::{CanonicalStatus, Shipment};
use crate::status;

/// A purchase transaction owning one or more shipments as its line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,

    pub buyer_id: Uuid,

    pub total_amount: Decimal,

    /// ISO 4217 currency code.
    pub currency: String,

    pub created_at: DateTime<Utc>,

    /// The order's own backend-supplied status, used when the shipments
    /// alone do not decide the overall state.
    pub raw_status: String,

    pub shipments: Vec<Shipment>,
}

impl Order {
    /// Overall order status: `Completed` once every shipment has completed,
    /// otherwise whatever the backend says about the order itself.
    pub fn derived_status(&self) -> CanonicalStatus {
        if !self.shipments.is_empty()
            && self
                .shipments
                .iter()
                .all(|s| s.canonical_status == CanonicalStatus::Completed)
        {
            return CanonicalStatus::Completed;
        }
        status::normalize(&self.raw_status)
    }
}
