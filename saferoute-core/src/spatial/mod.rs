//! Nearest-vertex resolution and proximity queries on the sphere

mod index;

pub use index::{SpatialIndex, nearest, nearest_item};

/// R-tree over the node store, keyed by node id
pub type NodeIndex = SpatialIndex<crate::NodeId>;
