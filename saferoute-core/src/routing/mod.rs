//! Criterion-weighted shortest paths with a directed-first, undirected-fallback policy

mod criterion;
mod dijkstra;
mod result;
mod router;
mod to_geojson;

pub use criterion::Criterion;
pub use result::{RouteMode, RouteResult, RouteSegment, seconds_to_minutes};
pub use router::route;
