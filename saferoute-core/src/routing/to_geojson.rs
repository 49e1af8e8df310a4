use geo::line_string;
use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::json;

use super::RouteResult;
use crate::Error;

impl RouteResult {
    /// Converts the route to a `GeoJSON` `FeatureCollection`: one `LineString`
    /// per traversed segment, flagged `flooded` for renderers to colour, plus
    /// `Point` features for the origin and destination.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GeoJsonError`] if a feature cannot be built
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let mut features = Vec::with_capacity(self.segments.len() + 2);

        for (idx, segment) in self.segments.iter().enumerate() {
            let (from, to) = (self.coordinates[idx], self.coordinates[idx + 1]);
            let line = line_string![
                (x: from.x(), y: from.y()),
                (x: to.x(), y: to.y()),
            ];

            let value = json!({
                "type": "Feature",
                "geometry": Geometry::new((&line).into()),
                "properties": {
                    "feature_type": "segment",
                    "from": segment.from,
                    "to": segment.to,
                    "distance": segment.distance,
                    "time": segment.time,
                    "risk_cost": segment.risk_cost,
                    "flood_height": segment.flood_height,
                    "flooded": segment.is_flooded(),
                }
            });
            features.push(to_feature(value)?);
        }

        let endpoints = [
            ("origin", self.origin(), self.coordinates.first()),
            ("destination", self.destination(), self.coordinates.last()),
        ];
        for (kind, node, point) in endpoints {
            let (Some(node), Some(point)) = (node, point) else {
                continue;
            };
            let value = json!({
                "type": "Feature",
                "geometry": Geometry::new(point.into()),
                "properties": {
                    "feature_type": kind,
                    "node": node,
                }
            });
            features.push(to_feature(value)?);
        }

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: Some(
                json!({
                    "criterion": self.criterion,
                    "mode": self.mode,
                    "total_distance": self.total_distance,
                    "total_time": self.total_time,
                    "risky_edge_count": self.risky_edge_count,
                    "risky_node_count": self.risky_node_count,
                })
                .as_object()
                .cloned()
                .unwrap_or_default(),
            ),
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn to_feature(value: serde_json::Value) -> Result<Feature, Error> {
    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}
