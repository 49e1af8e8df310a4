use geo::Point;
use hashbrown::{HashMap, HashSet};
use log::debug;

use super::{RadiusPolicy, WorkingSubgraph};
use crate::{
    Error, NodeId,
    geodesy::haversine_points,
    loading::{EdgeSource, NodeStore},
};

/// Coordinates of the nodes included in a working subgraph
pub type CoordinateIndex = HashMap<NodeId, Point<f64>>;

/// Materializes the working subgraph for a route between `origin` and `destination`.
///
/// A node is included when it lies strictly closer than the policy radius to
/// either endpoint; edges are kept only when both endpoints were included.
/// Missing edge attributes were already defaulted while reading partitions.
///
/// # Errors
///
/// Returns [`Error::UnknownNode`] for endpoints absent from the store and
/// [`Error::DataLoad`] when edge partitions cannot be read
pub fn extract(
    origin: NodeId,
    destination: NodeId,
    nodes: &NodeStore,
    edges: &EdgeSource,
    policy: RadiusPolicy,
) -> Result<(WorkingSubgraph, CoordinateIndex), Error> {
    let origin_point = nodes.node(origin)?.geometry;
    let destination_point = nodes.node(destination)?.geometry;

    let endpoint_distance = haversine_points(&origin_point, &destination_point);
    let radius = policy.radius(endpoint_distance);
    debug!(
        "Extracting subgraph for {origin} -> {destination}: endpoints {endpoint_distance:.0} m apart, radius {radius:.0} m"
    );

    let mut subgraph = WorkingSubgraph::new(radius);
    let mut coordinates = CoordinateIndex::new();
    for node in nodes.iter() {
        if haversine_points(&origin_point, &node.geometry) < radius
            || haversine_points(&destination_point, &node.geometry) < radius
        {
            coordinates.insert(node.id, node.geometry);
            subgraph.add_node(node.clone());
        }
    }

    let included: HashSet<NodeId> = coordinates.keys().copied().collect();
    for edge in edges.induced_edges(|id| included.contains(&id))? {
        subgraph.add_edge(edge);
    }

    debug!(
        "Working subgraph has {} nodes and {} edges",
        subgraph.node_count(),
        subgraph.edge_count()
    );
    Ok((subgraph, coordinates))
}
