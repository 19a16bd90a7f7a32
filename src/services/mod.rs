pub mod coordinator;

pub use coordinator::{ShipmentCoordinator, ShipmentList, TransitionOutcome};
