use std::fmt;

use geo::Point;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::Criterion;
use crate::{Error, Meters, NodeId, Seconds, subgraph::WorkingSubgraph};

/// How a route was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteMode {
    DirectedWeighted,
    DirectedUnweighted,
    UndirectedWeighted,
    UndirectedUnweighted,
}

impl RouteMode {
    pub fn is_undirected(&self) -> bool {
        matches!(self, Self::UndirectedWeighted | Self::UndirectedUnweighted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectedWeighted => "directed_weighted",
            Self::DirectedUnweighted => "directed_unweighted",
            Self::UndirectedWeighted => "undirected_weighted",
            Self::UndirectedUnweighted => "undirected_unweighted",
        }
    }
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One traversed edge, with the attributes it had after penalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSegment {
    pub from: NodeId,
    pub to: NodeId,
    pub distance: Meters,
    pub time: Seconds,
    pub risk_cost: f64,
    pub flood_height: f64,
    /// Walked against the direction the edge is stored in
    pub reversed: bool,
}

impl RouteSegment {
    pub fn is_flooded(&self) -> bool {
        self.flood_height > 0.0
    }
}

/// Path and aggregate metrics of a computed route
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub path: Vec<NodeId>,
    pub coordinates: Vec<Point<f64>>,
    pub segments: Vec<RouteSegment>,
    pub criterion: Criterion,
    pub mode: RouteMode,
    pub total_distance: Meters,
    pub total_time: Seconds,
    pub risky_edge_count: usize,
    pub risky_node_count: usize,
}

impl RouteResult {
    /// Walks `path` through `subgraph` and sums up the traversed edges.
    ///
    /// Each step looks up `(u, v)` first and `(v, u)` second, since an
    /// undirected route may use an edge stored only in the reverse direction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] for a node outside the subgraph and
    /// [`Error::InvalidData`] for a step without any edge
    pub fn from_path(
        subgraph: &WorkingSubgraph,
        path: Vec<NodeId>,
        criterion: Criterion,
        mode: RouteMode,
    ) -> Result<Self, Error> {
        let coordinates = path
            .iter()
            .map(|&id| {
                subgraph
                    .node(id)
                    .map(|node| node.geometry)
                    .ok_or(Error::UnknownNode(id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let segments = path
            .iter()
            .tuple_windows()
            .map(|(&u, &v)| {
                let edge = subgraph.edge_between(u, v).ok_or_else(|| {
                    Error::InvalidData(format!("route step {u} -> {v} has no edge"))
                })?;
                Ok(RouteSegment {
                    from: u,
                    to: v,
                    distance: edge.distance,
                    time: edge.time,
                    risk_cost: edge.risk_cost,
                    flood_height: edge.flood_height,
                    reversed: edge.from != u,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let risky_node_count = path
            .iter()
            .filter_map(|&id| subgraph.node(id))
            .filter(|node| node.is_flooded())
            .count();

        Ok(Self {
            total_distance: segments.iter().map(|s| s.distance).sum(),
            total_time: segments.iter().map(|s| s.time).sum(),
            risky_edge_count: segments.iter().filter(|s| s.is_flooded()).count(),
            risky_node_count,
            path,
            coordinates,
            segments,
            criterion,
            mode,
        })
    }

    pub fn origin(&self) -> Option<NodeId> {
        self.path.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.path.last().copied()
    }

    /// `true` if any traversed edge is flooded
    pub fn crosses_flooding(&self) -> bool {
        self.risky_edge_count > 0
    }

    pub fn total_time_minutes(&self) -> f64 {
        seconds_to_minutes(self.total_time)
    }
}

/// The one conversion from edge time units to the minutes shown to users
pub fn seconds_to_minutes(seconds: Seconds) -> f64 {
    seconds / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edge, Node};

    fn abc() -> WorkingSubgraph {
        let mut subgraph = WorkingSubgraph::new(1000.0);
        subgraph.add_node(Node::new(1, 0.0, 0.0));
        subgraph.add_node(Node::new(2, 0.0, 0.001).with_flood_height(0.3));
        subgraph.add_node(Node::new(3, 0.0, 0.002));
        subgraph
    }

    #[test]
    fn reverse_stored_edge_is_summed() {
        let mut subgraph = abc();
        subgraph.add_edge(Edge::new(1, 2, 100.0, 10.0, 1.0, 0.0));
        // only C -> B is stored
        subgraph.add_edge(Edge::new(3, 2, 150.0, 15.0, 1.0, 0.2));

        let result = RouteResult::from_path(
            &subgraph,
            vec![1, 2, 3],
            Criterion::Distance,
            RouteMode::UndirectedWeighted,
        )
        .unwrap();

        assert_eq!(result.total_distance, 250.0);
        assert_eq!(result.total_time, 25.0);
        assert_eq!(result.risky_edge_count, 1);
        assert_eq!(result.risky_node_count, 1);
        assert!(result.segments[1].reversed);
        assert!(!result.segments[0].reversed);
        assert_eq!(result.coordinates.len(), 3);
    }

    #[test]
    fn missing_step_edge_is_rejected() {
        let mut subgraph = abc();
        subgraph.add_edge(Edge::new(1, 2, 100.0, 10.0, 1.0, 0.0));
        let err = RouteResult::from_path(
            &subgraph,
            vec![1, 2, 3],
            Criterion::Distance,
            RouteMode::DirectedWeighted,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn minutes_conversion() {
        assert_eq!(seconds_to_minutes(90.0), 1.5);
    }

    #[test]
    fn mode_names() {
        assert_eq!(RouteMode::UndirectedUnweighted.to_string(), "undirected_unweighted");
        assert!(RouteMode::UndirectedWeighted.is_undirected());
        assert!(!RouteMode::DirectedUnweighted.is_undirected());
    }
}
