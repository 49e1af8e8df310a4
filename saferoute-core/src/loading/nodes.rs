//! Node store: the full universe of graph vertices

use std::path::Path;

use hashbrown::HashMap;
use log::{info, warn};
use rayon::prelude::*;

use super::partitions::{list_partitions, read_partition};
use super::raw_types::RawNode;
use crate::{Error, NodeId, model::Node};

/// Every node of the dataset, loaded once and never mutated afterwards
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    nodes: Vec<Node>,
    positions: HashMap<NodeId, usize>,
}

impl NodeStore {
    /// Loads all node partitions of `dir`.
    ///
    /// A single malformed partition aborts the whole load: an incomplete node
    /// set would make nearest-node lookups silently pick the wrong vertex.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLoad`] if the directory is missing or any partition is malformed
    pub fn load(dir: &Path) -> Result<Self, Error> {
        let partitions = list_partitions(dir)?;

        let raw_partitions = partitions
            .par_iter()
            .map(|path| read_partition::<RawNode>(path))
            .collect::<Result<Vec<_>, _>>()?;

        let nodes = raw_partitions.into_iter().flatten().map(Node::from);
        let store = Self::from_nodes(nodes);

        info!(
            "Loaded {} nodes from {} partitions in {}",
            store.len(),
            partitions.len(),
            dir.display()
        );
        Ok(store)
    }

    /// Builds a store from already materialized nodes. A repeated id keeps
    /// its first occurrence.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        let mut store = Self::default();
        for node in nodes {
            if store.positions.contains_key(&node.id) {
                warn!("Duplicate node id {} - keeping first occurrence", node.id);
                continue;
            }
            store.positions.insert(node.id, store.nodes.len());
            store.nodes.push(node);
        }
        store
    }

    pub fn load_all(&self) -> &[Node] {
        &self.nodes
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.positions.get(&id).map(|&idx| &self.nodes[idx])
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] if the id is not in the store
    pub fn node(&self, id: NodeId) -> Result<&Node, Error> {
        self.get(id).ok_or(Error::UnknownNode(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        Node {
            id: raw.id,
            geometry: geo::Point::new(raw.x, raw.y),
            flood_height: raw.flood_height,
        }
    }
}
