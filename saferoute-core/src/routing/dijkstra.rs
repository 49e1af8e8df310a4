use std::{cmp::Ordering, collections::BinaryHeap};

use hashbrown::HashMap;
use itertools::Either;
use petgraph::graph::NodeIndex;

use super::Criterion;
use crate::{Error, model::Edge, subgraph::WorkingSubgraph};

/// Which edges a search may follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Traversal {
    /// Stored edge directions only
    Directed,
    /// Both directions, antiparallel edges merged
    Undirected,
}

/// Edge cost used by the search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Weighting {
    Criterion(Criterion),
    /// Every edge costs one hop
    Unweighted,
}

impl Weighting {
    fn weight(self, edge: &Edge) -> f64 {
        match self {
            Self::Criterion(criterion) => edge.weight(criterion),
            Self::Unweighted => 1.0,
        }
    }
}

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: NodeIndex,
}

impl Eq for State {}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost (reversed from standard Rust BinaryHeap),
        // equal costs pop the lower node index first
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-source single-target Dijkstra over the working subgraph.
///
/// Returns the path cost and the visited node indices from `start` to
/// `target`, or `None` when `target` is unreachable.
///
/// # Errors
///
/// Returns [`Error::NegativeWeight`] as soon as a negative (or NaN) weight is relaxed
pub(super) fn shortest_path(
    subgraph: &WorkingSubgraph,
    start: NodeIndex,
    target: NodeIndex,
    traversal: Traversal,
    weighting: Weighting,
) -> Result<Option<(f64, Vec<NodeIndex>)>, Error> {
    let mut distances: HashMap<NodeIndex, f64> = HashMap::new();
    let mut predecessors: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut heap = BinaryHeap::new();

    // Start node has distance 0
    heap.push(State {
        cost: 0.0,
        node: start,
    });
    distances.insert(start, 0.0);

    while let Some(State { cost, node }) = heap.pop() {
        if node == target {
            return Ok(Some((cost, reconstruct(&predecessors, start, target))));
        }

        // Skip if we've found a better path
        if distances.get(&node).is_some_and(|&best| cost > best) {
            continue;
        }

        let neighbors = match traversal {
            Traversal::Directed => Either::Left(subgraph.outgoing(node)),
            Traversal::Undirected => Either::Right(subgraph.adjacent(node)),
        };

        for (next, edge) in neighbors {
            let weight = weighting.weight(edge);
            if weight.is_nan() || weight < 0.0 {
                return Err(Error::NegativeWeight {
                    from: edge.from,
                    to: edge.to,
                    weight,
                });
            }
            let next_cost = cost + weight;

            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                    predecessors.insert(next, node);
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                        predecessors.insert(next, node);
                    }
                }
            }
        }
    }

    Ok(None)
}

fn reconstruct(
    predecessors: &HashMap<NodeIndex, NodeIndex>,
    start: NodeIndex,
    target: NodeIndex,
) -> Vec<NodeIndex> {
    let mut path = vec![target];
    let mut current = target;
    while current != start {
        match predecessors.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;

    fn diamond() -> WorkingSubgraph {
        // 1 -> 2 -> 4 is short in distance, 1 -> 3 -> 4 is short in time
        let mut subgraph = WorkingSubgraph::new(1000.0);
        for id in 1..=4 {
            subgraph.add_node(Node::new(id, 0.0, id as f64 * 0.001));
        }
        subgraph.add_edge(Edge::new(1, 2, 50.0, 100.0, 1.0, 0.0));
        subgraph.add_edge(Edge::new(2, 4, 50.0, 100.0, 1.0, 0.0));
        subgraph.add_edge(Edge::new(1, 3, 80.0, 10.0, 1.0, 0.0));
        subgraph.add_edge(Edge::new(3, 4, 80.0, 10.0, 1.0, 0.0));
        subgraph
    }

    fn ids(subgraph: &WorkingSubgraph, path: &[NodeIndex]) -> Vec<i64> {
        path.iter().map(|&idx| subgraph.node_id(idx)).collect()
    }

    #[test]
    fn criterion_changes_the_chosen_path() {
        let subgraph = diamond();
        let start = subgraph.node_index(1).unwrap();
        let target = subgraph.node_index(4).unwrap();

        let (cost, path) = shortest_path(
            &subgraph,
            start,
            target,
            Traversal::Directed,
            Weighting::Criterion(Criterion::Distance),
        )
        .unwrap()
        .unwrap();
        assert_eq!(cost, 100.0);
        assert_eq!(ids(&subgraph, &path), vec![1, 2, 4]);

        let (cost, path) = shortest_path(
            &subgraph,
            start,
            target,
            Traversal::Directed,
            Weighting::Criterion(Criterion::Time),
        )
        .unwrap()
        .unwrap();
        assert_eq!(cost, 20.0);
        assert_eq!(ids(&subgraph, &path), vec![1, 3, 4]);
    }

    #[test]
    fn directed_search_respects_edge_direction() {
        let subgraph = diamond();
        let start = subgraph.node_index(4).unwrap();
        let target = subgraph.node_index(1).unwrap();
        let directed = shortest_path(
            &subgraph,
            start,
            target,
            Traversal::Directed,
            Weighting::Unweighted,
        )
        .unwrap();
        assert!(directed.is_none());

        let (hops, _) = shortest_path(
            &subgraph,
            start,
            target,
            Traversal::Undirected,
            Weighting::Unweighted,
        )
        .unwrap()
        .unwrap();
        assert_eq!(hops, 2.0);
    }

    #[test]
    fn negative_weights_are_rejected() {
        let mut subgraph = diamond();
        subgraph.add_edge(Edge::new(1, 2, -5.0, 1.0, 1.0, 0.0));
        let result = shortest_path(
            &subgraph,
            subgraph.node_index(1).unwrap(),
            subgraph.node_index(4).unwrap(),
            Traversal::Directed,
            Weighting::Criterion(Criterion::Distance),
        );
        assert!(matches!(
            result,
            Err(Error::NegativeWeight { from: 1, to: 2, .. })
        ));
    }

    #[test]
    fn start_equal_to_target_is_a_trivial_path() {
        let subgraph = diamond();
        let idx = subgraph.node_index(2).unwrap();
        let (cost, path) = shortest_path(
            &subgraph,
            idx,
            idx,
            Traversal::Directed,
            Weighting::Criterion(Criterion::Distance),
        )
        .unwrap()
        .unwrap();
        assert_eq!(cost, 0.0);
        assert_eq!(path, vec![idx]);
    }
}
