//! Query endpoints as handed over by an address resolver

use serde::{Deserialize, Serialize};

use crate::geodesy::describe_coordinates;

/// A `(label, lat, lon)` location. The label comes from an external address
/// resolver and is optional; the core never parses free text itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            label: None,
            lat,
            lon,
        }
    }

    pub fn labelled(label: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            label: Some(label.into()),
            lat,
            lon,
        }
    }

    /// Resolver label, or the plain coordinates when the location is unnamed
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| describe_coordinates(self.lat, self.lon))
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}
