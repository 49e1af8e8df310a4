//! Edge partitions, streamed per extraction or kept as an immutable cache

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, trace};
use rayon::prelude::*;

use super::partitions::{list_partitions, read_partition};
use super::raw_types::RawEdge;
use crate::{Error, NodeId, model::Edge};

#[derive(Debug, Clone)]
pub enum EdgeSource {
    /// Partition directory, read again for every extraction
    Partitions(PathBuf),
    /// Edges read once at startup and shared read-only between queries
    Preloaded(Arc<Vec<Edge>>),
}

impl EdgeSource {
    pub fn partitions(dir: impl Into<PathBuf>) -> Self {
        Self::Partitions(dir.into())
    }

    pub fn from_edges(edges: Vec<Edge>) -> Self {
        Self::Preloaded(Arc::new(edges))
    }

    /// Reads every partition of `dir` into memory
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLoad`] if the directory is missing or a partition is malformed
    pub fn preload(dir: &Path) -> Result<Self, Error> {
        let edges = read_edges(dir, |_| true)?;
        info!("Preloaded {} edges from {}", edges.len(), dir.display());
        Ok(Self::from_edges(edges))
    }

    /// Edges whose endpoints both satisfy `keep`, in dataset order
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLoad`] when streaming partitions fails
    pub fn induced_edges<F>(&self, keep: F) -> Result<Vec<Edge>, Error>
    where
        F: Fn(NodeId) -> bool + Sync,
    {
        match self {
            Self::Partitions(dir) => read_edges(dir, keep),
            Self::Preloaded(edges) => Ok(edges
                .iter()
                .filter(|edge| keep(edge.from) && keep(edge.to))
                .copied()
                .collect()),
        }
    }
}

/// Partitions are filtered independently, so at most one unfiltered
/// partition per worker is held in memory.
fn read_edges<F>(dir: &Path, keep: F) -> Result<Vec<Edge>, Error>
where
    F: Fn(NodeId) -> bool + Sync,
{
    let partitions = list_partitions(dir)?;

    let kept = partitions
        .par_iter()
        .map(|path| {
            let records = read_partition::<RawEdge>(path)?;
            let total = records.len();
            let edges: Vec<Edge> = records
                .into_iter()
                .filter(|raw| keep(raw.origen) && keep(raw.destino))
                .map(Edge::from)
                .collect();
            trace!("{}: kept {} of {} edges", path.display(), edges.len(), total);
            Ok(edges)
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(kept.into_iter().flatten().collect())
}

/// Non-finite values are treated like absent ones
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl From<RawEdge> for Edge {
    fn from(raw: RawEdge) -> Self {
        Edge::with_defaults(
            raw.origen,
            raw.destino,
            finite(raw.distancia),
            finite(raw.tiempo),
            finite(raw.costo_total),
            finite(raw.altura_media),
        )
    }
}
