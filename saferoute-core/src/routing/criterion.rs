use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Edge attribute minimized by the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    /// Shortest route
    #[default]
    #[serde(alias = "distancia")]
    Distance,
    /// Fastest route
    #[serde(alias = "tiempo")]
    Time,
    /// Route with the lowest water height
    #[serde(alias = "altura")]
    FloodHeight,
    /// Route with the lowest estimated risk
    #[serde(alias = "costo_total")]
    RiskCost,
}

impl Criterion {
    pub const ALL: [Self; 4] = [Self::Distance, Self::Time, Self::FloodHeight, Self::RiskCost];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Time => "time",
            Self::FloodHeight => "flood_height",
            Self::RiskCost => "risk_cost",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criterion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" | "distancia" => Ok(Self::Distance),
            "time" | "tiempo" => Ok(Self::Time),
            "flood_height" | "altura" | "altura_media" => Ok(Self::FloodHeight),
            "risk_cost" | "costo_total" | "costo" => Ok(Self::RiskCost),
            other => Err(Error::InvalidData(format!("unknown criterion '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_english_and_dataset_names() {
        assert_eq!("distance".parse::<Criterion>().unwrap(), Criterion::Distance);
        assert_eq!("Tiempo".parse::<Criterion>().unwrap(), Criterion::Time);
        assert_eq!("altura".parse::<Criterion>().unwrap(), Criterion::FloodHeight);
        assert_eq!("costo_total".parse::<Criterion>().unwrap(), Criterion::RiskCost);
        assert!("speed".parse::<Criterion>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for criterion in Criterion::ALL {
            assert_eq!(criterion.to_string().parse::<Criterion>().unwrap(), criterion);
        }
    }

    #[test]
    fn serde_accepts_aliases() {
        let criterion: Criterion = serde_json::from_str(r#""costo_total""#).unwrap();
        assert_eq!(criterion, Criterion::RiskCost);
        assert_eq!(serde_json::to_string(&Criterion::FloodHeight).unwrap(), r#""flood_height""#);
    }
}
