use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    Meters, model::ParkingFacility, routing::RouteResult, spatial::nearest_item,
};

/// Flood exposure of a suggested parking facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParkingRisk {
    /// Underground facility reached through flooded streets
    UndergroundFloodRisk,
    Underground,
    Surface,
}

impl ParkingRisk {
    pub fn classify(route_floods: bool, is_underground: bool) -> Self {
        match (is_underground, route_floods) {
            (true, true) => Self::UndergroundFloodRisk,
            (true, false) => Self::Underground,
            (false, _) => Self::Surface,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::UndergroundFloodRisk => {
                "Underground parking on a route with flooded streets: high risk of water ingress"
            }
            Self::Underground => "Underground parking: avoid it if flooding is forecast",
            Self::Surface => "Surface parking",
        }
    }
}

impl fmt::Display for ParkingRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Nearest parking facility to a route destination and its exposure
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingAdvice {
    pub facility: ParkingFacility,
    pub distance_m: Meters,
    pub risk: ParkingRisk,
}

/// Nearest facility to `(dest_lat, dest_lon)` by haversine distance,
/// `None` when there are no facilities
pub fn nearest_parking(
    dest_lat: f64,
    dest_lon: f64,
    facilities: &[ParkingFacility],
) -> Option<(&ParkingFacility, Meters)> {
    nearest_item(dest_lat, dest_lon, facilities, |facility| facility.geometry)
}

/// Suggests the facility nearest to the last node of `route`
pub fn advise(route: &RouteResult, facilities: &[ParkingFacility]) -> Option<ParkingAdvice> {
    let destination = route.coordinates.last()?;
    let (facility, distance_m) = nearest_parking(destination.y(), destination.x(), facilities)?;
    Some(ParkingAdvice {
        risk: ParkingRisk::classify(route.crosses_flooding(), facility.is_underground),
        facility: facility.clone(),
        distance_m,
    })
}
