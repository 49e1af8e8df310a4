use std::sync::Arc;

use crate::{
    Error, Meters, NodeId,
    loading::{EdgeSource, NodeStore, RoutingConfig},
    model::{HazardPoint, Node, ParkingFacility},
    spatial::NodeIndex,
};

/// Everything a query needs, loaded once and shared read-only between queries
#[derive(Debug, Clone)]
pub struct RoutingModel {
    pub(crate) nodes: Arc<NodeStore>,
    pub(crate) index: Arc<NodeIndex>,
    pub(crate) edges: EdgeSource,
    pub(crate) hazards: Arc<Vec<HazardPoint>>,
    pub(crate) parking: Arc<Vec<ParkingFacility>>,
    pub(crate) config: RoutingConfig,
}

impl RoutingModel {
    /// Assembles a model from already loaded parts
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyNodeSet`] if `nodes` is empty and
    /// [`Error::InvalidData`] for an invalid `config`
    pub fn new(
        nodes: NodeStore,
        edges: EdgeSource,
        hazards: Vec<HazardPoint>,
        parking: Vec<ParkingFacility>,
        config: RoutingConfig,
    ) -> Result<Self, Error> {
        if nodes.is_empty() {
            return Err(Error::EmptyNodeSet);
        }
        config.validate()?;

        let index = NodeIndex::from_nodes(nodes.iter());
        Ok(Self {
            nodes: Arc::new(nodes),
            index: Arc::new(index),
            edges,
            hazards: Arc::new(hazards),
            parking: Arc::new(parking),
            config,
        })
    }

    /// Nearest graph vertex to `(lat, lon)` and its distance
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyNodeSet`] if the model holds no nodes
    pub fn resolve(&self, lat: f64, lon: f64) -> Result<(NodeId, Meters), Error> {
        self.index.nearest(lat, lon)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, Error> {
        self.nodes.node(id)
    }

    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    pub fn edges(&self) -> &EdgeSource {
        &self.edges
    }

    pub fn hazards(&self) -> &[HazardPoint] {
        &self.hazards
    }

    pub fn parking(&self) -> &[ParkingFacility] {
        &self.parking
    }

    pub fn config(&self) -> RoutingConfig {
        self.config
    }

    /// Replaces the per-query tunables, keeping the loaded data
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] for an invalid `config`, such as a
    /// penalty factor below 1
    pub fn with_config(mut self, config: RoutingConfig) -> Result<Self, Error> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }
}
