//! Hazard and parking reference datasets

use std::path::Path;

use log::{info, warn};

use super::partitions::read_partition;
use super::raw_types::{RawEmergencyService, RawIncident, RawParking};
use crate::{
    Error,
    model::{HazardKind, HazardPoint, ParkingFacility},
};

/// Loads reported incidents. Records without coordinates are skipped.
///
/// # Errors
///
/// Returns [`Error::DataLoad`] if the file is missing or malformed
pub fn load_incidents(path: &Path) -> Result<Vec<HazardPoint>, Error> {
    let records = read_partition::<RawIncident>(path)?;
    let total = records.len();

    let incidents: Vec<HazardPoint> = records
        .into_iter()
        .filter_map(|raw| {
            let (lat, lon) = (raw.lat?, raw.lng?);
            let label = match raw.nivel {
                Some(serde_json::Value::String(level)) => format!("Incident ({level})"),
                Some(serde_json::Value::Null) | None => "Incident (no level)".to_string(),
                Some(level) => format!("Incident ({level})"),
            };
            Some(HazardPoint::new(lat, lon, HazardKind::Incident, label))
        })
        .collect();

    if incidents.len() < total {
        warn!(
            "Skipped {} incidents without coordinates in {}",
            total - incidents.len(),
            path.display()
        );
    }
    Ok(incidents)
}

/// Loads emergency service locations. `latitud`/`longitud` take precedence
/// over `lat`/`lng`; records with neither are skipped.
///
/// # Errors
///
/// Returns [`Error::DataLoad`] if the file is missing or malformed
pub fn load_emergency_services(path: &Path) -> Result<Vec<HazardPoint>, Error> {
    let records = read_partition::<RawEmergencyService>(path)?;
    let total = records.len();

    let services: Vec<HazardPoint> = records
        .into_iter()
        .filter_map(|raw| {
            let lat = raw.latitud.or(raw.lat)?;
            let lon = raw.longitud.or(raw.lng)?;
            let label = raw
                .nombre
                .unwrap_or_else(|| "Emergency service".to_string());
            Some(HazardPoint::new(lat, lon, HazardKind::EmergencyService, label))
        })
        .collect();

    if services.len() < total {
        warn!(
            "Skipped {} emergency services without coordinates in {}",
            total - services.len(),
            path.display()
        );
    }
    Ok(services)
}

/// # Errors
///
/// Returns [`Error::DataLoad`] if the file is missing or malformed
pub fn load_parking(path: &Path) -> Result<Vec<ParkingFacility>, Error> {
    let facilities: Vec<ParkingFacility> = read_partition::<RawParking>(path)?
        .into_iter()
        .map(|raw| ParkingFacility {
            geometry: geo::Point::new(raw.lon, raw.lat),
            is_underground: raw.is_underground,
            name: raw.name,
        })
        .collect();

    info!(
        "Loaded {} parking facilities ({} underground)",
        facilities.len(),
        facilities.iter().filter(|p| p.is_underground).count()
    );
    Ok(facilities)
}
