//! Route directive computation for the "view route" action.
//!
//! Each endpoint resolves to a `"lat,lng"` pair when coordinates are stored,
//! falling back to the party's free-text address. During the pickup and
//! delivery phases the origin prefers the live device position; geolocation
//! failure is expected (permission denied, no capability, timeout) and falls
//! back silently to the next source. When either endpoint resolves to
//! nothing at all, the builder returns [`RouteDirective::Unavailable`] and
//! the caller must disable the navigation action instead of opening a broken
//! link.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::gateway::LocationProvider;
use crate::models::shipment::{CanonicalStatus, Party, Shipment};

/// An origin/destination pair for the external map opener, or a sentinel
/// when no usable route exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteDirective {
    Available { origin: String, destination: String },
    Unavailable,
}

impl RouteDirective {
    pub fn is_available(&self) -> bool {
        matches!(self, RouteDirective::Available { .. })
    }
}

/// Resolve a party to a navigable endpoint: coordinates first, then the
/// free-text address. Blank addresses do not count.
fn endpoint(party: &Party) -> Option<String> {
    if let Some(coords) = party.coords {
        return Some(coords.to_string());
    }
    party
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_owned)
}

/// Build the route directive for a shipment's current canonical state.
///
/// | State                | Origin                          | Destination |
/// |----------------------|---------------------------------|-------------|
/// | Collecting           | live position, else farmer      | farmer      |
/// | InProgress           | live position, else farmer      | buyer       |
/// | Pending / Completed  | farmer                          | buyer       |
///
/// The live-position wait is bounded by `location_timeout`; on timeout or
/// provider error the origin falls back to the farmer endpoint without
/// surfacing anything to the user.
pub async fn build_route(
    shipment: &Shipment,
    location: &dyn LocationProvider,
    location_timeout: Duration,
) -> RouteDirective {
    let farmer = endpoint(&shipment.farmer);
    let buyer = endpoint(&shipment.buyer);

    let (origin, destination) = match shipment.canonical_status {
        CanonicalStatus::Collecting => {
            let live = live_position(location, location_timeout).await;
            (live.or(farmer.clone()), farmer)
        }
        CanonicalStatus::InProgress => {
            let live = live_position(location, location_timeout).await;
            (live.or(farmer), buyer)
        }
        CanonicalStatus::Pending | CanonicalStatus::Completed => (farmer, buyer),
    };

    match (origin, destination) {
        (Some(origin), Some(destination)) => RouteDirective::Available {
            origin,
            destination,
        },
        _ => RouteDirective::Unavailable,
    }
}

async fn live_position(
    location: &dyn LocationProvider,
    wait: Duration,
) -> Option<String> {
    match tokio::time::timeout(wait, location.current_position()).await {
        Ok(Ok(position)) => Some(position.to_string()),
        Ok(Err(err)) => {
            debug!(error = %err, "geolocation unavailable, falling back to stored endpoint");
            None
        }
        Err(_) => {
            debug!(timeout_ms = wait.as_millis() as u64, "geolocation timed out");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use crate::models::shipment::{GeoPoint, ProductLine};
    use async_trait::async_trait;
    use uuid::Uuid;

    struct FixedLocation(Option<GeoPoint>);

    #[async_trait]
    impl LocationProvider for FixedLocation {
        async fn current_position(&self) -> Result<GeoPoint, GatewayError> {
            self.0
                .ok_or_else(|| GatewayError::PositionUnavailable("denied".into()))
        }
    }

    struct NeverResolves;

    #[async_trait]
    impl LocationProvider for NeverResolves {
        async fn current_position(&self) -> Result<GeoPoint, GatewayError> {
            std::future::pending().await
        }
    }

    fn shipment(status: CanonicalStatus) -> Shipment {
        let mut farmer = Party::new(Uuid::new_v4(), "Farmer");
        farmer.coords = Some(GeoPoint::new(1.5, 2.5));
        farmer.address = Some("12 Farm Road".into());
        let mut buyer = Party::new(Uuid::new_v4(), "Buyer");
        buyer.address = Some("9 Market Street".into());
        Shipment {
            id: Uuid::new_v4(),
            external_order_id: "ORD-9".into(),
            raw_status: String::new(),
            canonical_status: status,
            product: ProductLine {
                name: "Beans".into(),
                quantity: 3,
                unit: "kg".into(),
            },
            farmer,
            buyer,
            transporter: Some(Party::new(Uuid::new_v4(), "Transporter")),
            shop_owner_id: None,
            transport_cost: None,
            distance_km: None,
            scheduled_date: None,
            scheduled_time: None,
            created_at: None,
        }
    }

    const WAIT: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn collecting_prefers_live_position_toward_the_farmer() {
        let s = shipment(CanonicalStatus::Collecting);
        let live = FixedLocation(Some(GeoPoint::new(9.0, 9.0)));
        let route = build_route(&s, &live, WAIT).await;
        assert_eq!(
            route,
            RouteDirective::Available {
                origin: "9,9".into(),
                destination: "1.5,2.5".into(),
            }
        );
    }

    #[tokio::test]
    async fn geolocation_denial_falls_back_to_the_farmer_endpoint() {
        let s = shipment(CanonicalStatus::Collecting);
        let route = build_route(&s, &FixedLocation(None), WAIT).await;
        assert_eq!(
            route,
            RouteDirective::Available {
                origin: "1.5,2.5".into(),
                destination: "1.5,2.5".into(),
            }
        );
    }

    #[tokio::test]
    async fn geolocation_timeout_is_non_fatal() {
        let s = shipment(CanonicalStatus::InProgress);
        let route = build_route(&s, &NeverResolves, Duration::from_millis(10)).await;
        assert_eq!(
            route,
            RouteDirective::Available {
                origin: "1.5,2.5".into(),
                destination: "9 Market Street".into(),
            }
        );
    }

    #[tokio::test]
    async fn in_progress_routes_to_the_buyer() {
        let s = shipment(CanonicalStatus::InProgress);
        let live = FixedLocation(Some(GeoPoint::new(4.0, 4.0)));
        let route = build_route(&s, &live, WAIT).await;
        assert_eq!(
            route,
            RouteDirective::Available {
                origin: "4,4".into(),
                destination: "9 Market Street".into(),
            }
        );
    }

    #[tokio::test]
    async fn default_view_routes_farmer_to_buyer_without_geolocation() {
        let s = shipment(CanonicalStatus::Pending);
        // NeverResolves would hang if the default view consulted geolocation
        let route = build_route(&s, &NeverResolves, WAIT).await;
        assert_eq!(
            route,
            RouteDirective::Available {
                origin: "1.5,2.5".into(),
                destination: "9 Market Street".into(),
            }
        );
    }

    #[tokio::test]
    async fn address_fallback_when_coordinates_are_missing() {
        let mut s = shipment(CanonicalStatus::Completed);
        s.farmer.coords = None;
        let route = build_route(&s, &FixedLocation(None), WAIT).await;
        assert_eq!(
            route,
            RouteDirective::Available {
                origin: "12 Farm Road".into(),
                destination: "9 Market Street".into(),
            }
        );
    }

    #[tokio::test]
    async fn unresolvable_endpoints_yield_the_sentinel() {
        let mut s = shipment(CanonicalStatus::Pending);
        s.buyer.coords = None;
        s.buyer.address = Some("   ".into());
        let route = build_route(&s, &FixedLocation(None), WAIT).await;
        assert_eq!(route, RouteDirective::Unavailable);
        assert!(!route.is_available());
    }
}
