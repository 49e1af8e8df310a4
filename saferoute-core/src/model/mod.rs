//! Data model for hazard-aware routing
//!
//! Contains the typed graph records, the hazard reference data, parking facilities
//! and the shared routing model.

pub mod hazard;
pub mod location;
pub mod network;
pub mod parking;
pub mod routing_model;

pub use hazard::{HazardKind, HazardPoint};
pub use location::Location;
pub use network::{Edge, EdgeAttributes, Node};
pub use parking::ParkingFacility;
pub use routing_model::RoutingModel;
