use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_HAZARD_RADIUS_M, DEFAULT_PENALTY_FACTOR, Error, Meters,
    geodesy::haversine_points,
    model::HazardPoint,
    spatial::SpatialIndex,
    subgraph::WorkingSubgraph,
};

/// Hazard sets up to this size are scanned linearly
const LINEAR_SCAN_LIMIT: usize = 64;

/// Penalty applied to flooded edges whose source node is near a hazard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardPenalty {
    /// Hazards strictly closer than this trigger the penalty
    #[serde(default = "default_radius")]
    pub radius_m: Meters,
    /// Multiplier for distance, time, risk cost and flood height
    #[serde(default = "default_factor")]
    pub factor: f64,
}

fn default_radius() -> Meters {
    DEFAULT_HAZARD_RADIUS_M
}

fn default_factor() -> f64 {
    DEFAULT_PENALTY_FACTOR
}

impl Default for HazardPenalty {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_HAZARD_RADIUS_M,
            factor: DEFAULT_PENALTY_FACTOR,
        }
    }
}

impl HazardPenalty {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !self.radius_m.is_finite() || self.radius_m < 0.0 {
            return Err(Error::InvalidData(format!(
                "hazard radius must be non-negative, got {}",
                self.radius_m
            )));
        }
        // weights may only grow
        if !self.factor.is_finite() || self.factor < 1.0 {
            return Err(Error::InvalidData(format!(
                "penalty factor must be at least 1, got {}",
                self.factor
            )));
        }
        Ok(())
    }
}

/// Penalizes `subgraph` in place with the default 150 m / ×2 penalty.
///
/// Returns the number of penalized edges.
pub fn penalize(subgraph: &mut WorkingSubgraph, hazards: &[HazardPoint]) -> usize {
    penalize_with(subgraph, hazards, HazardPenalty::default())
}

/// Scales every flooded edge whose source node lies near at least one hazard.
///
/// The penalty is binary: a segment close to several hazards is scaled once.
/// Edges without flood height are never touched. Applying the penalty twice
/// scales twice, so a query must call this exactly once per subgraph.
///
/// Returns the number of penalized edges.
pub fn penalize_with(
    subgraph: &mut WorkingSubgraph,
    hazards: &[HazardPoint],
    penalty: HazardPenalty,
) -> usize {
    subgraph.record_penalty_pass();
    if hazards.is_empty() {
        return 0;
    }

    let index = (hazards.len() > LINEAR_SCAN_LIMIT).then(|| {
        SpatialIndex::new(
            hazards
                .iter()
                .enumerate()
                .map(|(position, hazard)| (position, hazard.geometry)),
        )
    });

    let sources: Vec<_> = subgraph
        .edges()
        .map(|edge| {
            edge.is_flooded()
                .then(|| subgraph.node(edge.from).map(|node| node.geometry))
                .flatten()
        })
        .collect();

    let mut penalized = 0;
    for (edge, source) in subgraph.edges_mut().zip(sources) {
        let Some(source) = source else {
            continue;
        };
        let near_hazard = match &index {
            Some(index) => index.any_within(source.y(), source.x(), penalty.radius_m),
            None => hazards
                .iter()
                .any(|hazard| haversine_points(&source, &hazard.geometry) < penalty.radius_m),
        };
        if near_hazard {
            edge.scale(penalty.factor);
            penalized += 1;
        }
    }

    debug!(
        "Penalized {penalized} of {} edges near {} hazards",
        subgraph.edge_count(),
        hazards.len()
    );
    penalized
}
