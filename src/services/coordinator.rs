//! Shipment lifecycle coordination.
//!
//! One coordinator instance backs all four shipment screens (transporter
//! deliveries, buyer orders, shop orders, order detail); the screens used to
//! each carry their own copy of this logic and disagreed in the corners.
//! The coordinator owns the fetch-normalize-snapshot cycle, the two-phase
//! transition protocol, and route opening. It never patches the list
//! locally: after a successful status update the whole list is re-fetched
//! and the backend's answer is authoritative.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::aggregator::{self, ShipmentFilters, SortOrder, StatusCounts};
use crate::config::CoreConfig;
use crate::errors::CoreError;
use crate::events::{Event, EventSender};
use crate::gateway::{FetchScope, LocationProvider, NavigationOpener, ShipmentGateway};
use crate::lifecycle::{self, TransitionKind};
use crate::models::shipment::{CanonicalStatus, Shipment, UserContext};
use crate::permissions;
use crate::routing::{self, RouteDirective};
use crate::status;

/// A normalized snapshot of the user's shipments plus per-state counts.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentList {
    pub shipments: Vec<Shipment>,
    pub counts: StatusCounts,
    pub fetched_at: DateTime<Utc>,
}

impl ShipmentList {
    /// Filtered, sorted view of this snapshot for one screen.
    pub fn view(&self, filters: &ShipmentFilters, sort: SortOrder) -> Vec<Shipment> {
        aggregator::aggregate(std::slice::from_ref(&self.shipments), filters, sort)
    }
}

/// Result of a confirmed transition. The update itself succeeded; the
/// follow-up re-fetch is reported separately so a screen can keep its
/// last-known-good list when only the refresh failed.
#[derive(Debug)]
pub struct TransitionOutcome {
    pub target: CanonicalStatus,
    pub refreshed: Result<ShipmentList, CoreError>,
}

/// Coordinates shipment fetches, lifecycle transitions, and route opening
/// over the injected collaborators.
#[derive(Clone)]
pub struct ShipmentCoordinator {
    gateway: Arc<dyn ShipmentGateway>,
    location: Arc<dyn LocationProvider>,
    navigation: Arc<dyn NavigationOpener>,
    event_sender: EventSender,
    config: CoreConfig,
    in_flight: Arc<DashMap<Uuid, ()>>,
    epoch: Arc<AtomicU64>,
}

impl ShipmentCoordinator {
    pub fn new(
        gateway: Arc<dyn ShipmentGateway>,
        location: Arc<dyn LocationProvider>,
        navigation: Arc<dyn NavigationOpener>,
        event_sender: EventSender,
        config: CoreConfig,
    ) -> Self {
        Self {
            gateway,
            location,
            navigation,
            event_sender,
            config,
            in_flight: Arc::new(DashMap::new()),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fetch the given scopes, normalize every record's status, and return
    /// the snapshot. A result that lands after [`invalidate`] was called is
    /// discarded as [`CoreError::Cancelled`] instead of being applied to a
    /// stale view.
    ///
    /// [`invalidate`]: ShipmentCoordinator::invalidate
    #[instrument(skip_all, fields(scope_count = scopes.len()))]
    pub async fn refresh(&self, scopes: &[FetchScope]) -> Result<ShipmentList, CoreError> {
        let epoch = self.epoch.load(Ordering::Acquire);

        let mut shipments = Vec::new();
        for scope in scopes {
            let mut bucket = self
                .gateway
                .fetch_shipments(*scope)
                .await
                .map_err(|e| {
                    error!(%scope, error = %e, "shipment fetch failed");
                    CoreError::FetchFailed(e)
                })?;
            for shipment in &mut bucket {
                shipment.canonical_status = status::normalize(&shipment.raw_status);
            }
            shipments.extend(bucket);
        }

        if self.epoch.load(Ordering::Acquire) != epoch {
            info!("discarding fetch result superseded by invalidate");
            return Err(CoreError::Cancelled);
        }

        let counts = aggregator::status_counts(&shipments);
        self.event_sender.send(Event::ShipmentListRefreshed {
            total: shipments.len(),
            timestamp: Utc::now(),
        });

        Ok(ShipmentList {
            shipments,
            counts,
            fetched_at: Utc::now(),
        })
    }

    /// The transitions the acting user may currently trigger on a shipment.
    pub fn permitted_actions(
        &self,
        shipment: &Shipment,
        user: &UserContext,
    ) -> Vec<TransitionKind> {
        permissions::permitted_transitions(shipment, user)
    }

    /// Phase one of the transition protocol: the confirmation text a screen
    /// must show before calling [`request_transition`].
    ///
    /// [`request_transition`]: ShipmentCoordinator::request_transition
    pub fn confirmation_prompt(&self, kind: TransitionKind, shipment: &Shipment) -> String {
        kind.confirmation_prompt(shipment)
    }

    /// Phase two: push the confirmed transition to the backend, then
    /// re-fetch the authoritative list.
    ///
    /// The status sent is the target state re-expressed in the backend's
    /// vocabulary; nothing is mutated locally, so a failed update leaves the
    /// displayed state untouched. While a transition for a shipment is in
    /// flight, from the update call through the follow-up re-fetch, a second
    /// request for the same shipment is rejected. The call is never retried
    /// automatically: a blind retry could double-advance a shipment whose
    /// first update succeeded but whose response was lost.
    #[instrument(skip_all, fields(shipment_id = %shipment.id, kind = ?kind))]
    pub async fn request_transition(
        &self,
        shipment: &Shipment,
        user: &UserContext,
        kind: TransitionKind,
        scopes: &[FetchScope],
    ) -> Result<TransitionOutcome, CoreError> {
        if !permissions::can_transition(shipment, user, kind) {
            return Err(CoreError::PermissionDenied(format!(
                "user {} may not trigger {:?} on shipment {}",
                user.id, kind, shipment.id
            )));
        }

        let target = kind.target();
        lifecycle::ensure_forward(shipment.canonical_status, target)?;

        match self.in_flight.entry(shipment.id) {
            Entry::Occupied(_) => {
                warn!("transition already in flight");
                return Err(CoreError::TransitionInFlight(shipment.id));
            }
            Entry::Vacant(slot) => {
                slot.insert(());
            }
        }

        let update = self
            .gateway
            .update_shipment_status(shipment.id, status::to_raw(target))
            .await;

        if let Err(e) = update {
            self.in_flight.remove(&shipment.id);
            error!(error = %e, "status update rejected, shipment state unchanged");
            return Err(CoreError::UpdateFailed(e));
        }

        info!(from = %shipment.canonical_status, to = %target, "shipment transitioned");
        self.event_sender.send(Event::ShipmentTransitioned {
            shipment_id: shipment.id,
            from: shipment.canonical_status,
            to: target,
            timestamp: Utc::now(),
        });

        // Re-fetch failure is reported inside the outcome: the update stood,
        // the screen keeps its last-known-good list and surfaces the fetch
        // error on its own. The guard stays held until the re-fetch settles;
        // the action is not resolved until the authoritative list is back.
        let refreshed = self.refresh(scopes).await;
        self.in_flight.remove(&shipment.id);
        Ok(TransitionOutcome { target, refreshed })
    }

    /// Remove a completed shipment from the acting user's history. Only
    /// participants in the shipment (or privileged roles) may delete it.
    #[instrument(skip(self, shipment, user), fields(shipment_id = %shipment.id))]
    pub async fn delete_completed(
        &self,
        shipment: &Shipment,
        user: &UserContext,
    ) -> Result<(), CoreError> {
        if shipment.canonical_status != CanonicalStatus::Completed {
            return Err(CoreError::NotCompleted(shipment.id));
        }
        if !is_participant(shipment, user) && !user.role.is_privileged() {
            return Err(CoreError::PermissionDenied(format!(
                "user {} is not a participant in shipment {}",
                user.id, shipment.id
            )));
        }

        self.gateway
            .delete_shipment(shipment.id)
            .await
            .map_err(|e| {
                error!(error = %e, "shipment delete failed");
                CoreError::DeleteFailed(e)
            })?;

        self.event_sender.send(Event::ShipmentDeleted {
            shipment_id: shipment.id,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Route directive for the shipment's current state. Geolocation is
    /// bounded by the configured timeout and its failure never surfaces.
    pub async fn view_route(&self, shipment: &Shipment) -> RouteDirective {
        routing::build_route(shipment, &*self.location, self.config.geolocation_timeout()).await
    }

    /// Build the route and hand it to the external navigation opener.
    /// Returns whether navigation was opened; callers disable the action on
    /// `false` rather than opening a broken link.
    #[instrument(skip(self, shipment), fields(shipment_id = %shipment.id))]
    pub async fn open_route(&self, shipment: &Shipment) -> bool {
        match self.view_route(shipment).await {
            RouteDirective::Available {
                origin,
                destination,
            } => {
                self.navigation.open(&origin, &destination);
                true
            }
            RouteDirective::Unavailable => {
                warn!("no resolvable route endpoints, navigation disabled");
                false
            }
        }
    }

    /// Discard any outstanding fetch results. Called when the consuming
    /// screen is torn down so a late response is not applied to a stale
    /// view.
    pub fn invalidate(&self) {
        self.epoch.fetch_add(1, Ordering::Release);
    }
}

fn is_participant(shipment: &Shipment, user: &UserContext) -> bool {
    user.id == shipment.buyer.id
        || user.id == shipment.farmer.id
        || shipment.shop_owner_id == Some(user.id)
        || shipment
            .transporter
            .as_ref()
            .is_some_and(|t| t.id == user.id)
}
