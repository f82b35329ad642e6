use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    geo::{self, GeoError},
    id::HasId,
};

use crate::{geojson::Geometry, ExampleData, WithDistance};

/// A longitude/latitude pair in degrees.
///
/// Longitude is expected in `[-180, 180]`, latitude in `[-90, 90]`; the
/// bounding box calculation additionally rejects the poles themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    /// Fixed fallback position (Tokyo Station), served to clients whose
    /// device geolocation is unavailable or denied.
    pub const FALLBACK: Coordinates = Coordinates {
        longitude: 139.7670516,
        latitude: 35.6811673,
    };

    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// The axis-aligned search region of `radius_km` around this point.
    pub fn bounding_box(&self, radius_km: f64) -> Result<BoundingBox, GeoError> {
        let ((min_lat, min_lng), (max_lat, max_lng)) =
            geo::calculate_bounding_box(self.latitude, self.longitude, radius_km)?;
        Ok(BoundingBox {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        })
    }

    /// Great-circle distance to another coordinate in kilometers.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        geo::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    /// `lng,lat` as used by the Mapbox `proximity` and path parameters.
    pub fn query_value(&self) -> String {
        format!("{},{}", self.longitude, self.latitude)
    }
}

/// A search region in degree space. Derived from a center and radius,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn center(&self) -> Coordinates {
        Coordinates {
            longitude: (self.min_lng + self.max_lng) / 2.0,
            latitude: (self.min_lat + self.max_lat) / 2.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// `minLng,minLat,maxLng,maxLat` with six decimals, as expected by the
    /// Mapbox `bbox` query parameter.
    pub fn query_value(&self) -> String {
        format!(
            "{:.6},{:.6},{:.6},{:.6}",
            self.min_lng, self.min_lat, self.max_lng, self.max_lat
        )
    }

    /// The box as a closed GeoJSON polygon ring, for rendering the search
    /// region on a map.
    pub fn to_polygon(&self) -> Geometry {
        Geometry::Polygon {
            coordinates: vec![vec![
                [self.min_lng, self.min_lat],
                [self.max_lng, self.min_lat],
                [self.max_lng, self.max_lat],
                [self.min_lng, self.max_lat],
                [self.min_lng, self.min_lat],
            ]],
        }
    }
}

/// A point of interest returned by a place search. Read-only once created;
/// its identifier lives in the surrounding [`crate::WithId`].
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub name: String,
    pub location: Coordinates,
    pub address: Option<String>,
    pub category: Option<String>,
}

impl Place {
    pub fn with_distance_to(self, center: &Coordinates) -> WithDistance<Place> {
        let distance = center.distance_to(&self.location);
        WithDistance::new(distance, self)
    }
}

impl HasId for Place {
    type IdType = String;
}

impl ExampleData for Place {
    fn example_data() -> Self {
        Place {
            name: "イオンスタイル板橋前野町".to_owned(),
            location: Coordinates::new(139.6869, 35.7793),
            address: Some("東京都板橋区前野町4-21-22".to_owned()),
            category: Some("grocery".to_owned()),
        }
    }
}

impl ExampleData for Coordinates {
    fn example_data() -> Self {
        Coordinates::FALLBACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_query_value_has_six_decimals() {
        let bbox = Coordinates::new(139.767, 35.681)
            .bounding_box(15.0)
            .unwrap();
        let value = bbox.query_value();
        let parts: Vec<&str> = value.split(',').collect();
        assert_eq!(parts.len(), 4);
        for part in parts {
            let decimals = part.split('.').nth(1).unwrap();
            assert_eq!(decimals.len(), 6, "unexpected precision in {value}");
        }
    }

    #[test]
    fn bounding_box_center_matches_the_input() {
        let center = Coordinates::new(139.767, 35.681);
        let bbox = center.bounding_box(15.0).unwrap();
        let middle = bbox.center();
        assert!((middle.longitude - center.longitude).abs() < 1e-9);
        assert!((middle.latitude - center.latitude).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_dimensions_grow_with_the_radius() {
        let center = Coordinates::new(139.767, 35.681);
        let small = center.bounding_box(5.0).unwrap();
        let large = center.bounding_box(10.0).unwrap();
        assert!(large.width() > small.width());
        assert!(large.height() > small.height());
        assert!((large.height() - 2.0 * 10.0 / 111.0).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_polygon_ring_is_closed() {
        let bbox = Coordinates::new(10.0, 54.0).bounding_box(2.0).unwrap();
        match bbox.to_polygon() {
            Geometry::Polygon { coordinates } => {
                let ring = &coordinates[0];
                assert_eq!(ring.len(), 5);
                assert_eq!(ring.first(), ring.last());
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn place_distance_wrapper_uses_the_straight_line() {
        let center = Coordinates::FALLBACK;
        let place = Place {
            name: "駅前スーパー".to_owned(),
            location: Coordinates::new(139.6969226, 35.691595),
            address: None,
            category: None,
        };
        let with_distance = place.with_distance_to(&center);
        assert!((with_distance.distance_km - 6.4).abs() < 0.3);
    }

    #[test]
    fn place_serializes_without_empty_fields() {
        let place = Place {
            name: "test".to_owned(),
            location: Coordinates::new(0.0, 0.0),
            address: None,
            category: None,
        };
        let json = serde_json::to_value(&place).unwrap();
        assert!(json.get("address").is_none());
        assert!(json.get("category").is_none());
    }
}
