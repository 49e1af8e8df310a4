//! The per-query pipeline: resolve, extract, penalize, route, advise

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    Error, Meters, NodeId, RoutingModel,
    hazard::penalize_with,
    model::Location,
    parking::{ParkingAdvice, advise},
    routing::{Criterion, RouteResult, route},
    subgraph::extract,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteQuery {
    pub origin: Location,
    pub destination: Location,
    #[serde(default)]
    pub criterion: Criterion,
}

impl RouteQuery {
    pub fn new(origin: Location, destination: Location, criterion: Criterion) -> Self {
        Self {
            origin,
            destination,
            criterion,
        }
    }
}

/// A query endpoint snapped to the graph
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEndpoint {
    pub location: Location,
    pub node: NodeId,
    /// Distance from the requested location to the snapped node
    pub snap_distance: Meters,
}

/// Outcome of [`plan_route`]
#[derive(Debug, Clone, PartialEq)]
pub struct RouteReport {
    pub origin: ResolvedEndpoint,
    pub destination: ResolvedEndpoint,
    pub subgraph_nodes: usize,
    pub subgraph_edges: usize,
    pub radius: Meters,
    pub penalized_edges: usize,
    /// Times hazard penalties were applied to the working subgraph; always 1
    pub penalty_passes: u32,
    pub route: RouteResult,
    pub parking: Option<ParkingAdvice>,
}

/// Answers one route query against a shared model.
///
/// Every call builds and penalizes its own working subgraph, so concurrent or
/// repeated queries never observe each other's penalties.
///
/// # Errors
///
/// - [`Error::InvalidData`] for out-of-range coordinates
/// - [`Error::NoPath`] if the endpoints are disconnected in the working subgraph
/// - [`Error::DataLoad`] if edge partitions cannot be read
pub fn plan_route(model: &RoutingModel, query: &RouteQuery) -> Result<RouteReport, Error> {
    let origin = resolve_endpoint(model, &query.origin)?;
    let destination = resolve_endpoint(model, &query.destination)?;

    let config = model.config();
    let (mut subgraph, _) = extract(
        origin.node,
        destination.node,
        model.nodes(),
        model.edges(),
        config.radius,
    )?;
    let penalized_edges = penalize_with(&mut subgraph, model.hazards(), config.penalty);
    let route = route(&subgraph, origin.node, destination.node, query.criterion)?;
    let parking = advise(&route, model.parking());

    info!(
        "Route {} -> {} by {}: {:.0} m, {:.1} min, {} flooded segments ({})",
        origin.location.display_label(),
        destination.location.display_label(),
        query.criterion,
        route.total_distance,
        route.total_time_minutes(),
        route.risky_edge_count,
        route.mode
    );

    Ok(RouteReport {
        origin,
        destination,
        subgraph_nodes: subgraph.node_count(),
        subgraph_edges: subgraph.edge_count(),
        radius: subgraph.radius(),
        penalized_edges,
        penalty_passes: subgraph.penalty_passes(),
        route,
        parking,
    })
}

fn resolve_endpoint(model: &RoutingModel, location: &Location) -> Result<ResolvedEndpoint, Error> {
    if !location.is_valid() {
        return Err(Error::InvalidData(format!(
            "coordinates out of range: {}, {}",
            location.lat, location.lon
        )));
    }
    let (node, snap_distance) = model.resolve(location.lat, location.lon)?;
    Ok(ResolvedEndpoint {
        location: location.clone(),
        node,
        snap_distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        RoutingConfig,
        loading::{EdgeSource, NodeStore},
        model::{Edge, HazardKind, HazardPoint, Node, ParkingFacility},
        parking::ParkingRisk,
    };

    /// A(0,0) -> B(0,0.001) -> C(0,0.002), B -> C flooded, an incident next to B
    fn model() -> RoutingModel {
        let nodes = NodeStore::from_nodes([
            Node::new(1, 0.0, 0.0),
            Node::new(2, 0.0, 0.001),
            Node::new(3, 0.0, 0.002),
        ]);
        let edges = EdgeSource::from_edges(vec![
            Edge::new(1, 2, 100.0, 10.0, 1.0, 0.0),
            Edge::new(2, 3, 100.0, 10.0, 1.0, 0.5),
        ]);
        let hazards = vec![HazardPoint::new(0.0005, 0.001, HazardKind::Incident, "flood")];
        let parking = vec![ParkingFacility::new(0.0001, 0.002, true)];
        RoutingModel::new(nodes, edges, hazards, parking, RoutingConfig::default()).unwrap()
    }

    fn query(criterion: Criterion) -> RouteQuery {
        RouteQuery::new(
            Location::labelled("start", 0.00001, 0.0),
            Location::new(0.0, 0.00199),
            criterion,
        )
    }

    #[test]
    fn pipeline_penalizes_once_and_advises_parking() {
        let report = plan_route(&model(), &query(Criterion::Distance)).unwrap();

        assert_eq!(report.origin.node, 1);
        assert_eq!(report.destination.node, 3);
        assert_eq!(report.penalized_edges, 1);
        assert_eq!(report.penalty_passes, 1);
        assert_eq!(report.route.path, vec![1, 2, 3]);
        assert_eq!(report.route.total_distance, 300.0);
        assert_eq!(report.subgraph_nodes, 3);

        let parking = report.parking.unwrap();
        assert_eq!(parking.risk, ParkingRisk::UndergroundFloodRisk);
    }

    #[test]
    fn repeated_queries_do_not_accumulate_penalties() {
        let model = model();
        let first = plan_route(&model, &query(Criterion::Distance)).unwrap();
        let second = plan_route(&model, &query(Criterion::Distance)).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.penalty_passes, 1);
        assert_eq!(second.route.total_distance, 300.0);
    }

    #[test]
    fn same_endpoint_gives_single_node_route() {
        let query = RouteQuery::new(Location::new(0.0, 0.001), Location::new(0.0, 0.001), Criterion::Time);
        let report = plan_route(&model(), &query).unwrap();
        assert_eq!(report.route.path, vec![2]);
        assert_eq!(report.route.total_time, 0.0);
    }

    #[test]
    fn invalid_coordinates_are_rejected() {
        let query = RouteQuery::new(Location::new(95.0, 0.0), Location::new(0.0, 0.0), Criterion::Time);
        assert!(matches!(plan_route(&model(), &query), Err(Error::InvalidData(_))));
    }
}
