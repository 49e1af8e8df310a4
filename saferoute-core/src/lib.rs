//! Hazard-aware routing over flood-exposed street networks.
//!
//! A query resolves its endpoints to graph vertices, extracts a bounded working
//! subgraph around them, penalizes flooded edges near reported hazards and runs
//! a criterion-weighted shortest path search with a directed/undirected fallback.

pub mod error;
pub mod geodesy;
pub mod hazard;
pub mod loading;
pub mod model;
pub mod parking;
pub mod prelude;
pub mod query;
pub mod routing;
pub mod spatial;
pub mod subgraph;

pub use error::Error;
pub use loading::{DatasetConfig, RoutingConfig, create_routing_model};
pub use model::RoutingModel;
pub use query::{ResolvedEndpoint, RouteQuery, RouteReport, plan_route};

/// Identifier of a street graph vertex, as found in the node dataset
pub type NodeId = i64;
/// Length in meters
pub type Meters = f64;
/// Duration in seconds
pub type Seconds = f64;

/// Mean Earth radius used by every haversine evaluation
pub const EARTH_RADIUS_M: Meters = 6_371_000.0;
/// Margin added to half the endpoint distance when sizing the working subgraph
pub const DEFAULT_RADIUS_MARGIN_M: Meters = 800.0;
/// Distance from a hazard under which a flooded edge gets penalized
pub const DEFAULT_HAZARD_RADIUS_M: Meters = 150.0;
/// Multiplier applied to the weights of a penalized edge
pub const DEFAULT_PENALTY_FACTOR: f64 = 2.0;
