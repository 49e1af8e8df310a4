use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Error, hazard::HazardPenalty, subgraph::RadiusPolicy};

/// Locations of the datasets a routing model is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Directory of node partitions
    pub nodes_dir: PathBuf,
    /// Directory of edge partitions
    pub edges_dir: PathBuf,
    /// Reported incidents; no incident hazards when absent
    #[serde(default)]
    pub incidents_path: Option<PathBuf>,
    /// Emergency service locations; no service hazards when absent
    #[serde(default)]
    pub emergency_services_path: Option<PathBuf>,
    /// Parking facilities; parking advice is skipped when absent
    #[serde(default)]
    pub parking_path: Option<PathBuf>,
    /// Keep all edges in memory instead of streaming partitions per query
    #[serde(default)]
    pub preload_edges: bool,
}

impl DatasetConfig {
    pub fn new(nodes_dir: impl Into<PathBuf>, edges_dir: impl Into<PathBuf>) -> Self {
        Self {
            nodes_dir: nodes_dir.into(),
            edges_dir: edges_dir.into(),
            incidents_path: None,
            emergency_services_path: None,
            parking_path: None,
            preload_edges: false,
        }
    }

    #[must_use]
    pub fn with_hazards(
        mut self,
        incidents_path: impl Into<PathBuf>,
        emergency_services_path: impl Into<PathBuf>,
    ) -> Self {
        self.incidents_path = Some(incidents_path.into());
        self.emergency_services_path = Some(emergency_services_path.into());
        self
    }

    #[must_use]
    pub fn with_parking(mut self, parking_path: impl Into<PathBuf>) -> Self {
        self.parking_path = Some(parking_path.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        for dir in [&self.nodes_dir, &self.edges_dir] {
            if !dir.is_dir() {
                return Err(Error::data_load(dir, "dataset directory not found"));
            }
        }

        let files = [
            &self.incidents_path,
            &self.emergency_services_path,
            &self.parking_path,
        ];
        for path in files.into_iter().flatten() {
            if !path.is_file() {
                return Err(Error::data_load(path, "file not found"));
            }
        }

        Ok(())
    }
}

/// Tunables of the per-query pipeline
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default)]
    pub radius: RadiusPolicy,
    #[serde(default)]
    pub penalty: HazardPenalty,
}

impl RoutingConfig {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        self.radius.validate()?;
        self.penalty.validate()
    }
}
