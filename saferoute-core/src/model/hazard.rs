//! Hazard reference data used to penalize flooded segments

use geo::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    /// Reported incident (flooded street, fallen tree, ...)
    Incident,
    /// Location of an emergency service
    EmergencyService,
}

/// Point of interest that makes nearby flooded edges riskier
#[derive(Debug, Clone, PartialEq)]
pub struct HazardPoint {
    pub geometry: Point<f64>,
    pub kind: HazardKind,
    pub label: String,
}

impl HazardPoint {
    pub fn new(lat: f64, lon: f64, kind: HazardKind, label: impl Into<String>) -> Self {
        Self {
            geometry: Point::new(lon, lat),
            kind,
            label: label.into(),
        }
    }

    pub fn lat(&self) -> f64 {
        self.geometry.y()
    }

    pub fn lon(&self) -> f64 {
        self.geometry.x()
    }
}
