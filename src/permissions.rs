//! Permission evaluation for lifecycle transitions.
//!
//! Denial is silent: a screen simply does not offer the action. Reaching the
//! update call with a denied transition is a wiring defect, which the
//! coordinator reports as [`crate::errors::CoreError::PermissionDenied`].

use strum::IntoEnumIterator;

use crate::lifecycle::TransitionKind;
use crate::models::shipment::{Shipment, UserContext};

/// Whether the acting user may trigger the given transition on the shipment.
///
/// Transporter-only steps require the actor to be the assigned transporter.
/// The self-pickup step requires no transporter and an actor who is the
/// buyer, the farmer, the shop owner, or holds a privileged role.
pub fn can_transition(shipment: &Shipment, user: &UserContext, kind: TransitionKind) -> bool {
    if !kind.applies_to(shipment) {
        return false;
    }

    match kind {
        TransitionKind::StartPickup
        | TransitionKind::ConfirmCollected
        | TransitionKind::ConfirmDelivered => shipment
            .transporter
            .as_ref()
            .is_some_and(|t| t.id == user.id),

        TransitionKind::MarkSelfCollected => {
            shipment.is_self_pickup()
                && (user.id == shipment.buyer.id
                    || user.id == shipment.farmer.id
                    || shipment.shop_owner_id == Some(user.id)
                    || user.role.is_privileged())
        }
    }
}

/// The set of transitions the user may currently trigger, for rendering
/// action buttons. At most one per shipment given the linear lifecycle, but
/// returned as a set so screens need no knowledge of the machine's shape.
pub fn permitted_transitions(shipment: &Shipment, user: &UserContext) -> Vec<TransitionKind> {
    TransitionKind::iter()
        .filter(|kind| can_transition(shipment, user, *kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::shipment::{CanonicalStatus, Party, ProductLine, Role};
    use uuid::Uuid;

    struct Fixture {
        shipment: Shipment,
        transporter_id: Uuid,
        buyer_id: Uuid,
        farmer_id: Uuid,
    }

    fn fixture(status: CanonicalStatus, with_transporter: bool) -> Fixture {
        let transporter_id = Uuid::new_v4();
        let buyer_id = Uuid::new_v4();
        let farmer_id = Uuid::new_v4();
        let shipment = Shipment {
            id: Uuid::new_v4(),
            external_order_id: "ORD-7".into(),
            raw_status: String::new(),
            canonical_status: status,
            product: ProductLine {
                name: "Maize".into(),
                quantity: 20,
                unit: "kg".into(),
            },
            farmer: Party::new(farmer_id, "Farmer"),
            buyer: Party::new(buyer_id, "Buyer"),
            transporter: with_transporter.then(|| Party::new(transporter_id, "Transporter")),
            shop_owner_id: None,
            transport_cost: None,
            distance_km: None,
            scheduled_date: None,
            scheduled_time: None,
            created_at: None,
        };
        Fixture {
            shipment,
            transporter_id,
            buyer_id,
            farmer_id,
        }
    }

    #[test]
    fn assigned_transporter_may_advance() {
        let f = fixture(CanonicalStatus::Pending, true);
        let transporter = UserContext::new(f.transporter_id, Role::Transporter);
        assert!(can_transition(&f.shipment, &transporter, TransitionKind::StartPickup));
    }

    #[test]
    fn other_transporters_are_denied() {
        let f = fixture(CanonicalStatus::Pending, true);
        let stranger = UserContext::new(Uuid::new_v4(), Role::Transporter);
        assert!(!can_transition(&f.shipment, &stranger, TransitionKind::StartPickup));
    }

    #[test]
    fn buyer_is_denied_transporter_steps_in_every_state() {
        for status in [
            CanonicalStatus::Pending,
            CanonicalStatus::Collecting,
            CanonicalStatus::InProgress,
            CanonicalStatus::Completed,
        ] {
            let f = fixture(status, true);
            let buyer = UserContext::new(f.buyer_id, Role::Buyer);
            for kind in [
                TransitionKind::StartPickup,
                TransitionKind::ConfirmCollected,
                TransitionKind::ConfirmDelivered,
            ] {
                assert!(
                    !can_transition(&f.shipment, &buyer, kind),
                    "buyer must be denied {kind:?} at {status:?}"
                );
            }
        }
    }

    #[test]
    fn self_pickup_allows_buyer_farmer_and_privileged() {
        let f = fixture(CanonicalStatus::Pending, false);
        let buyer = UserContext::new(f.buyer_id, Role::Buyer);
        let farmer = UserContext::new(f.farmer_id, Role::Farmer);
        let admin = UserContext::new(Uuid::new_v4(), Role::Admin);
        let stranger = UserContext::new(Uuid::new_v4(), Role::Buyer);

        assert!(can_transition(&f.shipment, &buyer, TransitionKind::MarkSelfCollected));
        assert!(can_transition(&f.shipment, &farmer, TransitionKind::MarkSelfCollected));
        assert!(can_transition(&f.shipment, &admin, TransitionKind::MarkSelfCollected));
        assert!(!can_transition(&f.shipment, &stranger, TransitionKind::MarkSelfCollected));
    }

    #[test]
    fn shop_owner_may_mark_self_collected() {
        let mut f = fixture(CanonicalStatus::Pending, false);
        let owner_id = Uuid::new_v4();
        f.shipment.shop_owner_id = Some(owner_id);
        let owner = UserContext::new(owner_id, Role::ShopOwner);
        assert!(can_transition(&f.shipment, &owner, TransitionKind::MarkSelfCollected));
    }

    #[test]
    fn mark_self_collected_requires_absent_transporter() {
        let f = fixture(CanonicalStatus::Pending, true);
        let buyer = UserContext::new(f.buyer_id, Role::Buyer);
        assert!(!can_transition(&f.shipment, &buyer, TransitionKind::MarkSelfCollected));
    }

    #[test]
    fn permitted_set_is_at_most_one_action() {
        let f = fixture(CanonicalStatus::Collecting, true);
        let transporter = UserContext::new(f.transporter_id, Role::Transporter);
        assert_eq!(
            permitted_transitions(&f.shipment, &transporter),
            vec![TransitionKind::ConfirmCollected]
        );

        let buyer = UserContext::new(f.buyer_id, Role::Buyer);
        assert!(permitted_transitions(&f.shipment, &buyer).is_empty());
    }
}
