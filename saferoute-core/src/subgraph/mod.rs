//! Per-query working subgraphs around an origin/destination pair

mod extract;
mod radius;
mod working;

pub use extract::{CoordinateIndex, extract};
pub use radius::RadiusPolicy;
pub use working::WorkingSubgraph;
