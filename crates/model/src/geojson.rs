//! The small slice of GeoJSON this service produces and consumes: point,
//! line and polygon geometries, plus the feature wrappers used by the
//! Mapbox Directions and Isochrone responses.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A longitude/latitude pair in GeoJSON order.
pub type Position = [f64; 2];

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    LineString { coordinates: Vec<Position> },
    Polygon { coordinates: Vec<Vec<Position>> },
}

impl Geometry {
    /// The position of a point geometry, `None` for lines and polygons.
    pub fn point(&self) -> Option<Position> {
        match self {
            Geometry::Point { coordinates } => Some(*coordinates),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Feature<P> {
    #[serde(rename = "type")]
    pub feature_type: String,
    pub properties: P,
    pub geometry: Geometry,
}

impl<P> Feature<P> {
    pub fn new(geometry: Geometry, properties: P) -> Self {
        Self {
            feature_type: "Feature".to_owned(),
            properties,
            geometry,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FeatureCollection<P> {
    #[serde(rename = "type")]
    pub collection_type: String,
    pub features: Vec<Feature<P>>,
}

impl<P> FeatureCollection<P> {
    pub fn new(features: Vec<Feature<P>>) -> Self {
        Self {
            collection_type: "FeatureCollection".to_owned(),
            features,
        }
    }
}

/// Properties carried by one isochrone contour.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IsochroneProperties {
    /// The contour value in minutes of travel time.
    pub contour: f64,
    /// Suggested rendering color as a css color string.
    #[serde(default)]
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_geometry_round_trips_through_json() {
        let json = r#"{"type":"Point","coordinates":[139.767,35.681]}"#;
        let geometry: Geometry = serde_json::from_str(json).unwrap();
        assert_eq!(geometry.point(), Some([139.767, 35.681]));
        assert_eq!(serde_json::to_string(&geometry).unwrap(), json);
    }

    #[test]
    fn line_string_is_not_a_point() {
        let json = r#"{"type":"LineString","coordinates":[[139.7,35.6],[139.8,35.7]]}"#;
        let geometry: Geometry = serde_json::from_str(json).unwrap();
        assert_eq!(geometry.point(), None);
    }

    #[test]
    fn constructed_collection_carries_the_geojson_type_tags() {
        let feature = Feature::new(
            Geometry::Point {
                coordinates: [139.767, 35.681],
            },
            IsochroneProperties {
                contour: 10.0,
                color: None,
            },
        );
        let collection = FeatureCollection::new(vec![feature]);

        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["type"], "Feature");
        assert_eq!(json["features"][0]["geometry"]["type"], "Point");
    }

    #[test]
    fn isochrone_feature_collection_decodes() {
        let json = r##"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "contour": 10, "color": "#007cbf" },
                "geometry": { "type": "Polygon", "coordinates": [[[139.7,35.6],[139.8,35.6],[139.8,35.7],[139.7,35.6]]] }
            }]
        }"##;
        let collection: FeatureCollection<IsochroneProperties> =
            serde_json::from_str(json).unwrap();
        assert_eq!(collection.features.len(), 1);
        assert_eq!(collection.features[0].properties.contour, 10.0);
        assert_eq!(
            collection.features[0].properties.color.as_deref(),
            Some("#007cbf")
        );
    }
}
