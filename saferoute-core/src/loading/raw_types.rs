//! Record layouts of the source datasets. Field names follow the files; the
//! loaders translate them into the typed model.

use serde::{Deserialize, Deserializer};

use crate::NodeId;

#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    pub id: NodeId,
    /// Longitude
    pub x: f64,
    /// Latitude
    pub y: f64,
    #[serde(default, alias = "altura_media", alias = "altura")]
    pub flood_height: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEdge {
    #[serde(alias = "from")]
    pub origen: NodeId,
    #[serde(alias = "to")]
    pub destino: NodeId,
    #[serde(default, alias = "distance")]
    pub distancia: Option<f64>,
    #[serde(default, alias = "time")]
    pub tiempo: Option<f64>,
    #[serde(default, alias = "risk_cost")]
    pub costo_total: Option<f64>,
    #[serde(default, alias = "flood_height")]
    pub altura_media: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawIncident {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    /// Severity, published either as text or as a number
    #[serde(default)]
    pub nivel: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEmergencyService {
    #[serde(default)]
    pub latitud: Option<f64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub longitud: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub nombre: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawParking {
    pub lat: f64,
    pub lon: f64,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_underground: bool,
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
}

/// Accepts `0`/`1` as well as JSON booleans
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(flag) => Ok(flag),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(other) => Err(serde::de::Error::custom(format!(
            "expected 0 or 1 for a flag, got {other}"
        ))),
    }
}
