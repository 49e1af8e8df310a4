use serde::{Deserialize, Serialize};

use crate::{DEFAULT_RADIUS_MARGIN_M, Error, Meters};

/// How far around the endpoints the working subgraph reaches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RadiusPolicy {
    /// Half the endpoint distance plus a margin, so the circles around both
    /// endpoints always overlap across the direct corridor
    Dynamic { margin_m: Meters },
    /// Constant radius. Endpoints further apart than twice the radius end up
    /// in disconnected components.
    Fixed { radius_m: Meters },
}

impl Default for RadiusPolicy {
    fn default() -> Self {
        Self::Dynamic {
            margin_m: DEFAULT_RADIUS_MARGIN_M,
        }
    }
}

impl RadiusPolicy {
    /// Inclusion radius for endpoints `endpoint_distance` meters apart
    pub fn radius(&self, endpoint_distance: Meters) -> Meters {
        match *self {
            Self::Dynamic { margin_m } => endpoint_distance / 2.0 + margin_m,
            Self::Fixed { radius_m } => radius_m,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        match *self {
            Self::Dynamic { margin_m } if !margin_m.is_finite() || margin_m <= 0.0 => Err(
                Error::InvalidData(format!("radius margin must be positive, got {margin_m}")),
            ),
            Self::Fixed { radius_m } if !radius_m.is_finite() || radius_m <= 0.0 => Err(
                Error::InvalidData(format!("fixed radius must be positive, got {radius_m}")),
            ),
            _ => Ok(()),
        }
    }
}
