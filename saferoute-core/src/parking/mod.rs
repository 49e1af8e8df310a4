//! Parking suggestions at the destination

mod advisor;

pub use advisor::{ParkingAdvice, ParkingRisk, advise, nearest_parking};
