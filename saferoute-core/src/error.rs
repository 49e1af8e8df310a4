use std::path::PathBuf;

use thiserror::Error;

use crate::NodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load dataset '{path}': {reason}")]
    DataLoad { path: PathBuf, reason: String },
    #[error("No nodes available to find the nearest node")]
    EmptyNodeSet,
    #[error("Node {0} is not part of the graph")]
    UnknownNode(NodeId),
    #[error("No route between {origin} and {destination}")]
    NoPath { origin: NodeId, destination: NodeId },
    #[error("Negative weight {weight} on edge {from} -> {to}")]
    NegativeWeight { from: NodeId, to: NodeId, weight: f64 },
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    pub(crate) fn data_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DataLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// `true` for the ordinary "no route" outcome, which callers report
    /// instead of treating as a failure
    pub fn is_no_path(&self) -> bool {
        matches!(self, Self::NoPath { .. })
    }
}
