//! agrolink-core
//!
//! Shipment lifecycle coordination core for a farming-marketplace client.
//! The marketplace backend owns every shipment's status as a free-text
//! string; this crate normalizes that vocabulary into a four-state canonical
//! lifecycle, decides who may advance a shipment and how, computes map
//! navigation directives per lifecycle stage, aggregates shipment lists for
//! the screens, and clamps order quantities into listing bounds.
//!
//! Network transport, geolocation, and map opening are injected behind the
//! traits in [`gateway`]; the [`services::ShipmentCoordinator`] orchestrates
//! them. All remaining modules are pure and synchronous.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod aggregator;
pub mod config;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod permissions;
pub mod quantity;
pub mod routing;
pub mod services;
pub mod status;

pub use aggregator::{aggregate, status_counts, ShipmentFilters, SortOrder, StatusCounts};
pub use config::CoreConfig;
pub use errors::CoreError;
pub use gateway::{FetchScope, GatewayError, LocationProvider, NavigationOpener, ShipmentGateway};
pub use lifecycle::TransitionKind;
pub use models::{
    CanonicalStatus, GeoPoint, Order, Party, QuantityConstraint, Role, Shipment, UserContext,
};
pub use quantity::clamp;
pub use routing::RouteDirective;
pub use services::{ShipmentCoordinator, ShipmentList, TransitionOutcome};
