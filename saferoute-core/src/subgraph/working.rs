//! Owned graph a single query routes and penalizes on

use hashbrown::HashMap;
use petgraph::{
    Direction,
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
};

use crate::{
    Meters, NodeId,
    model::{Edge, Node},
};

/// Induced subgraph holding its own copies of node and edge attributes.
///
/// Penalization mutates these copies only, so neither the node store nor
/// any other query ever observes the scaled weights.
#[derive(Debug, Clone, Default)]
pub struct WorkingSubgraph {
    pub(crate) graph: DiGraph<Node, Edge>,
    index: HashMap<NodeId, NodeIndex>,
    radius: Meters,
    penalty_passes: u32,
}

impl WorkingSubgraph {
    pub fn new(radius: Meters) -> Self {
        Self {
            radius,
            ..Self::default()
        }
    }

    /// Adds a node; a node with an already known id is ignored
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        if let Some(&idx) = self.index.get(&node.id) {
            return idx;
        }
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        idx
    }

    /// Adds a directed edge, replacing the attributes of an existing edge
    /// between the same endpoints. Returns `false` and drops the edge when an
    /// endpoint is not part of the subgraph.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        match (self.index.get(&edge.from), self.index.get(&edge.to)) {
            (Some(&from), Some(&to)) => {
                self.graph.update_edge(from, to, edge);
                true
            }
            _ => false,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&idx| &self.graph[idx])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub(crate) fn node_index(&self, id: NodeId) -> Option<NodeIndex> {
        self.index.get(&id).copied()
    }

    pub(crate) fn node_id(&self, idx: NodeIndex) -> NodeId {
        self.graph[idx].id
    }

    fn edge_index(&self, from: NodeId, to: NodeId) -> Option<EdgeIndex> {
        self.graph
            .find_edge(self.node_index(from)?, self.node_index(to)?)
    }

    /// Directed edge `from -> to`
    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.edge_index(from, to).map(|idx| &self.graph[idx])
    }

    /// Edge joining `u` and `v`: `(u, v)` when stored, `(v, u)` otherwise.
    /// Undirected routes may walk an edge against its stored direction.
    pub fn edge_between(&self, u: NodeId, v: NodeId) -> Option<&Edge> {
        self.edge(u, v).or_else(|| self.edge(v, u))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_weights()
    }

    pub(crate) fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.graph.edge_weights_mut()
    }

    /// Neighbours reachable from `idx` following stored edge directions
    pub(crate) fn outgoing(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, &Edge)> {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge| (edge.target(), edge.weight()))
    }

    /// Neighbours of `idx` with directions ignored. Antiparallel pairs are
    /// merged: the edge stored from `idx` wins over the reverse one, matching
    /// the lookup order of [`Self::edge_between`].
    pub(crate) fn adjacent(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, &Edge)> {
        let incoming = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .filter(move |edge| self.graph.find_edge(idx, edge.source()).is_none())
            .map(|edge| (edge.source(), edge.weight()));
        self.outgoing(idx).chain(incoming)
    }

    /// `true` if `origin` reaches `destination` following edge directions
    pub fn has_directed_path(&self, origin: NodeId, destination: NodeId) -> bool {
        match (self.node_index(origin), self.node_index(destination)) {
            (Some(from), Some(to)) => petgraph::algo::has_path_connecting(&self.graph, from, to, None),
            _ => false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Inclusion radius the subgraph was extracted with
    pub fn radius(&self) -> Meters {
        self.radius
    }

    /// How many times hazard penalties were applied to this subgraph
    pub fn penalty_passes(&self) -> u32 {
        self.penalty_passes
    }

    pub(crate) fn record_penalty_pass(&mut self) {
        self.penalty_passes += 1;
    }
}
