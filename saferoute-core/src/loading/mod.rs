//! This module is responsible for loading the partitioned node/edge datasets
//! and the hazard/parking reference data, and for building the routing model.

mod builder;
mod config;
pub mod edges;
pub mod nodes;
mod partitions;
pub mod raw_types;
pub mod reference;

pub use builder::create_routing_model;
pub use config::{DatasetConfig, RoutingConfig};
pub use edges::EdgeSource;
pub use nodes::NodeStore;
pub use partitions::{list_partitions, read_partition};
pub use reference::{load_emergency_services, load_incidents, load_parking};
