// Core models
pub mod listing;
pub mod order;
pub mod shipment;

pub use listing::QuantityConstraint;
pub use order::Order;
pub use shipment::{
    CanonicalStatus, GeoPoint, Party, ProductLine, Role, Shipment, UserContext,
};
