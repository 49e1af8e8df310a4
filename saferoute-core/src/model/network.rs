//! Street graph components - nodes and directed edges

use geo::Point;

use crate::{Meters, NodeId, Seconds, routing::Criterion};

/// Street graph vertex
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// Node coordinates (`x` = longitude, `y` = latitude)
    pub geometry: Point<f64>,
    /// Water height at the node itself, when the dataset reports one
    pub flood_height: Option<f64>,
}

impl Node {
    pub fn new(id: NodeId, lat: f64, lon: f64) -> Self {
        Self {
            id,
            geometry: Point::new(lon, lat),
            flood_height: None,
        }
    }

    #[must_use]
    pub fn with_flood_height(mut self, flood_height: f64) -> Self {
        self.flood_height = Some(flood_height);
        self
    }

    pub fn lat(&self) -> f64 {
        self.geometry.y()
    }

    pub fn lon(&self) -> f64 {
        self.geometry.x()
    }

    pub fn is_flooded(&self) -> bool {
        self.flood_height.is_some_and(|height| height > 0.0)
    }
}

/// Which attributes the source record actually carried. Absent ones were
/// filled with defaults at extraction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeAttributes {
    pub distance: bool,
    pub time: bool,
    pub risk_cost: bool,
    pub flood_height: bool,
}

impl EdgeAttributes {
    pub const ALL: Self = Self {
        distance: true,
        time: true,
        risk_cost: true,
        flood_height: true,
    };

    pub fn carries(&self, criterion: Criterion) -> bool {
        match criterion {
            Criterion::Distance => self.distance,
            Criterion::Time => self.time,
            Criterion::RiskCost => self.risk_cost,
            Criterion::FloodHeight => self.flood_height,
        }
    }
}

/// Directed street segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub distance: Meters,
    pub time: Seconds,
    /// Estimated risk of walking the segment
    pub risk_cost: f64,
    /// Mean water height over the segment
    pub flood_height: f64,
    pub provided: EdgeAttributes,
}

impl Edge {
    pub const DEFAULT_DISTANCE: Meters = 1.0;
    pub const DEFAULT_TIME: Seconds = 1.0;
    pub const DEFAULT_RISK_COST: f64 = 1.0;
    pub const DEFAULT_FLOOD_HEIGHT: f64 = 0.0;

    /// Edge with every attribute given explicitly
    pub fn new(
        from: NodeId,
        to: NodeId,
        distance: Meters,
        time: Seconds,
        risk_cost: f64,
        flood_height: f64,
    ) -> Self {
        Self {
            from,
            to,
            distance,
            time,
            risk_cost,
            flood_height,
            provided: EdgeAttributes::ALL,
        }
    }

    /// Builds an edge from optional attributes, substituting the documented defaults
    pub fn with_defaults(
        from: NodeId,
        to: NodeId,
        distance: Option<Meters>,
        time: Option<Seconds>,
        risk_cost: Option<f64>,
        flood_height: Option<f64>,
    ) -> Self {
        Self {
            from,
            to,
            distance: distance.unwrap_or(Self::DEFAULT_DISTANCE),
            time: time.unwrap_or(Self::DEFAULT_TIME),
            risk_cost: risk_cost.unwrap_or(Self::DEFAULT_RISK_COST),
            flood_height: flood_height.unwrap_or(Self::DEFAULT_FLOOD_HEIGHT),
            provided: EdgeAttributes {
                distance: distance.is_some(),
                time: time.is_some(),
                risk_cost: risk_cost.is_some(),
                flood_height: flood_height.is_some(),
            },
        }
    }

    pub fn weight(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Distance => self.distance,
            Criterion::Time => self.time,
            Criterion::RiskCost => self.risk_cost,
            Criterion::FloodHeight => self.flood_height,
        }
    }

    pub fn is_flooded(&self) -> bool {
        self.flood_height > 0.0
    }

    /// Multiplies every weight by `factor`
    pub(crate) fn scale(&mut self, factor: f64) {
        self.distance *= factor;
        self.time *= factor;
        self.risk_cost *= factor;
        self.flood_height *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_attributes_fall_back_to_defaults() {
        let edge = Edge::with_defaults(1, 2, Some(35.0), None, None, None);
        assert_eq!(edge.distance, 35.0);
        assert_eq!(edge.time, 1.0);
        assert_eq!(edge.risk_cost, 1.0);
        assert_eq!(edge.flood_height, 0.0);
        assert!(edge.provided.distance);
        assert!(!edge.provided.carries(Criterion::Time));
        assert!(!edge.is_flooded());
    }

    #[test]
    fn weight_follows_criterion() {
        let edge = Edge::new(1, 2, 100.0, 12.0, 3.5, 0.2);
        assert_eq!(edge.weight(Criterion::Distance), 100.0);
        assert_eq!(edge.weight(Criterion::Time), 12.0);
        assert_eq!(edge.weight(Criterion::RiskCost), 3.5);
        assert_eq!(edge.weight(Criterion::FloodHeight), 0.2);
    }

    #[test]
    fn node_flooding_requires_positive_height() {
        assert!(!Node::new(1, 0.0, 0.0).is_flooded());
        assert!(!Node::new(1, 0.0, 0.0).with_flood_height(0.0).is_flooded());
        assert!(Node::new(1, 0.0, 0.0).with_flood_height(0.3).is_flooded());
    }
}
