// Re-export key components
pub use crate::hazard::{HazardPenalty, penalize, penalize_with};
pub use crate::loading::{DatasetConfig, EdgeSource, NodeStore, RoutingConfig, create_routing_model};
pub use crate::model::{
    Edge, HazardKind, HazardPoint, Location, Node, ParkingFacility, RoutingModel,
};
pub use crate::parking::{ParkingAdvice, ParkingRisk, advise, nearest_parking};
pub use crate::query::{ResolvedEndpoint, RouteQuery, RouteReport, plan_route};
pub use crate::routing::{Criterion, RouteMode, RouteResult, RouteSegment, route};
pub use crate::spatial::{NodeIndex, nearest};
pub use crate::subgraph::{RadiusPolicy, WorkingSubgraph, extract};

// Core types
pub use crate::Error;
pub use crate::Meters;
pub use crate::NodeId;
pub use crate::Seconds; // edge time unit
