//! Reachability contours via the Mapbox Isochrone API.

use std::sync::Arc;

use model::{
    geojson::{FeatureCollection, IsochroneProperties},
    place::Coordinates,
    route::RoutingProfile,
};

use crate::{client::MapboxApiClient, ApiError};

/* - MAPBOX ISOCHRONE API - */

/// The polygon reachable from `center` within `contour_minutes` of travel
/// by the given mode, as a GeoJSON feature collection ready for rendering.
pub async fn get_isochrone(
    client: Arc<MapboxApiClient>,
    center: &Coordinates,
    contour_minutes: u32,
    profile: RoutingProfile,
) -> Result<FeatureCollection<IsochroneProperties>, ApiError> {
    let endpoint = format!(
        "isochrone/v1/mapbox/{}/{}",
        profile.as_str(),
        center.query_value(),
    );

    client
        .get(
            &endpoint,
            &[
                ("contours_minutes", contour_minutes.to_string()),
                ("polygons", "true".to_owned()),
            ],
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::client::MapboxCredentials;

    #[tokio::test]
    async fn requests_polygon_contours_for_the_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/isochrone/v1/mapbox/cycling/139.767,35.681"))
            .and(query_param("contours_minutes", "10"))
            .and(query_param("polygons", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "properties": { "contour": 10, "color": "#007cbf" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[139.7, 35.6], [139.8, 35.6], [139.8, 35.7], [139.7, 35.6]]]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let credentials = MapboxCredentials {
            access_token: "test-token".to_owned(),
            rate_limit_per_minute: None,
            proxy: None,
        };
        let client =
            Arc::new(MapboxApiClient::new(&credentials).with_base_url(server.uri()));

        let contours = get_isochrone(
            client,
            &Coordinates::new(139.767, 35.681),
            10,
            RoutingProfile::Cycling,
        )
        .await
        .unwrap();

        assert_eq!(contours.features.len(), 1);
        assert_eq!(contours.features[0].properties.contour, 10.0);
    }
}
