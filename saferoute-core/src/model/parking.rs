use geo::Point;

/// Parking facility near a destination
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingFacility {
    pub geometry: Point<f64>,
    pub is_underground: bool,
    pub name: Option<String>,
}

impl ParkingFacility {
    pub fn new(lat: f64, lon: f64, is_underground: bool) -> Self {
        Self {
            geometry: Point::new(lon, lat),
            is_underground,
            name: None,
        }
    }

    pub fn lat(&self) -> f64 {
        self.geometry.y()
    }

    pub fn lon(&self) -> f64 {
        self.geometry.x()
    }
}
