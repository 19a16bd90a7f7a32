//! Shared fixtures for the integration suites.

use async_trait::async_trait;
use std::sync::Mutex;
use uuid::Uuid;

use agrolink_core::gateway::{GatewayError, LocationProvider, NavigationOpener};
use agrolink_core::models::shipment::{
    CanonicalStatus, GeoPoint, Party, ProductLine, Shipment,
};
use agrolink_core::status;

/// A shipment fixture builder. Defaults to a pending, transporter-fulfilled
/// tomato shipment; tweak fields per test.
pub struct ShipmentBuilder {
    shipment: Shipment,
}

impl ShipmentBuilder {
    pub fn new() -> Self {
        Self {
            shipment: Shipment {
                id: Uuid::new_v4(),
                external_order_id: "ORD-2001".into(),
                raw_status: "pending".into(),
                canonical_status: CanonicalStatus::Pending,
                product: ProductLine {
                    name: "Tomatoes".into(),
                    quantity: 12,
                    unit: "kg".into(),
                },
                farmer: Party::new(Uuid::new_v4(), "Asha Farm"),
                buyer: Party::new(Uuid::new_v4(), "Ben's Grocery"),
                transporter: Some(Party::new(Uuid::new_v4(), "Tariq Transport")),
                shop_owner_id: None,
                transport_cost: None,
                distance_km: None,
                scheduled_date: None,
                scheduled_time: None,
                created_at: None,
            },
        }
    }

    pub fn self_pickup(mut self) -> Self {
        self.shipment.transporter = None;
        self
    }

    pub fn raw_status(mut self, raw: &str) -> Self {
        self.shipment.raw_status = raw.to_string();
        self.shipment.canonical_status = status::normalize(raw);
        self
    }

    pub fn buyer_id(mut self, id: Uuid) -> Self {
        self.shipment.buyer.id = id;
        self
    }

    pub fn transporter_id(mut self, id: Uuid) -> Self {
        if let Some(t) = self.shipment.transporter.as_mut() {
            t.id = id;
        }
        self
    }

    pub fn build(self) -> Shipment {
        self.shipment
    }
}

impl Default for ShipmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Location provider with no capability; every request fails.
pub struct NoLocation;

#[async_trait]
impl LocationProvider for NoLocation {
    async fn current_position(&self) -> Result<GeoPoint, GatewayError> {
        Err(GatewayError::PositionUnavailable("no capability".into()))
    }
}

/// Records every navigation hand-off.
#[derive(Default)]
pub struct RecordingOpener {
    pub opened: Mutex<Vec<(String, String)>>,
}

impl NavigationOpener for RecordingOpener {
    fn open(&self, origin: &str, destination: &str) {
        self.opened
            .lock()
            .unwrap()
            .push((origin.to_string(), destination.to_string()));
    }
}
