use log::{debug, warn};

use super::dijkstra::{Traversal, Weighting, shortest_path};
use super::{Criterion, RouteMode, RouteResult};
use crate::{Error, NodeId, subgraph::WorkingSubgraph};

/// Computes the cheapest route from `origin` to `destination` under `criterion`.
///
/// The directed subgraph is tried first; only when `destination` is not
/// reachable along stored edge directions does the search fall back to the
/// undirected view. Searches are weighted by `criterion` unless no edge of the
/// subgraph carried that attribute in the source data, in which case every
/// edge counts as one hop. The returned [`RouteMode`] records which case applied.
///
/// # Errors
///
/// - [`Error::UnknownNode`] if an endpoint is not in the subgraph
/// - [`Error::NoPath`] if the endpoints are disconnected even when ignoring direction
/// - [`Error::NegativeWeight`] if the search meets a negative weight
pub fn route(
    subgraph: &WorkingSubgraph,
    origin: NodeId,
    destination: NodeId,
    criterion: Criterion,
) -> Result<RouteResult, Error> {
    let start = subgraph
        .node_index(origin)
        .ok_or(Error::UnknownNode(origin))?;
    let target = subgraph
        .node_index(destination)
        .ok_or(Error::UnknownNode(destination))?;

    let weighted = subgraph
        .edges()
        .any(|edge| edge.provided.carries(criterion));
    let (weighting, attempts) = if weighted {
        (
            Weighting::Criterion(criterion),
            [
                (Traversal::Directed, RouteMode::DirectedWeighted),
                (Traversal::Undirected, RouteMode::UndirectedWeighted),
            ],
        )
    } else {
        if subgraph.edge_count() > 0 {
            warn!("No edge carries '{criterion}' - falling back to unweighted search");
        }
        (
            Weighting::Unweighted,
            [
                (Traversal::Directed, RouteMode::DirectedUnweighted),
                (Traversal::Undirected, RouteMode::UndirectedUnweighted),
            ],
        )
    };

    for (traversal, mode) in attempts {
        if let Some((cost, indices)) = shortest_path(subgraph, start, target, traversal, weighting)? {
            debug!(
                "Found {mode} route {origin} -> {destination} over {} nodes, cost {cost:.2}",
                indices.len()
            );
            let path = indices
                .into_iter()
                .map(|idx| subgraph.node_id(idx))
                .collect();
            return RouteResult::from_path(subgraph, path, criterion, mode);
        }
        debug!("No {traversal:?} path {origin} -> {destination}");
    }

    Err(Error::NoPath {
        origin,
        destination,
    })
}
