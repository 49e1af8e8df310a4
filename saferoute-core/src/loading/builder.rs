use log::{debug, info};

use super::config::{DatasetConfig, RoutingConfig};
use super::edges::EdgeSource;
use super::nodes::NodeStore;
use super::reference::{load_emergency_services, load_incidents, load_parking};
use crate::{Error, RoutingModel};

/// Creates a routing model based on the provided dataset configuration
///
/// Nodes, hazards and parking facilities are read once; edges are either
/// preloaded or streamed from their partitions on every extraction.
///
/// # Errors
///
/// Returns an error if a configured path is missing, a dataset is malformed,
/// the node set is empty or `routing` is invalid
pub fn create_routing_model(
    dataset: &DatasetConfig,
    routing: RoutingConfig,
) -> Result<RoutingModel, Error> {
    dataset.validate()?;
    routing.validate()?;

    info!("Loading nodes from {}", dataset.nodes_dir.display());
    let nodes = NodeStore::load(&dataset.nodes_dir)?;
    if nodes.is_empty() {
        return Err(Error::EmptyNodeSet);
    }

    // incidents first, then emergency services
    let mut hazards = match &dataset.incidents_path {
        Some(path) => load_incidents(path)?,
        None => Vec::new(),
    };
    let incident_count = hazards.len();
    if let Some(path) = &dataset.emergency_services_path {
        hazards.extend(load_emergency_services(path)?);
    }
    info!(
        "Loaded {} hazard points ({} incidents, {} emergency services)",
        hazards.len(),
        incident_count,
        hazards.len() - incident_count
    );

    let parking = match &dataset.parking_path {
        Some(path) => load_parking(path)?,
        None => {
            debug!("No parking dataset configured");
            Vec::new()
        }
    };

    let edges = if dataset.preload_edges {
        EdgeSource::preload(&dataset.edges_dir)?
    } else {
        EdgeSource::partitions(&dataset.edges_dir)
    };

    let model = RoutingModel::new(nodes, edges, hazards, parking, routing)?;
    info!(
        "Routing model created: {} nodes, {} hazard points, {} parking facilities",
        model.nodes().len(),
        model.hazards().len(),
        model.parking().len()
    );
    Ok(model)
}
