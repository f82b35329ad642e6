//! Route computation via the Mapbox Directions API.

use std::sync::Arc;

use serde::Deserialize;

use model::{
    geojson::Geometry,
    place::Coordinates,
    route::{RouteInfo, RoutingProfile},
};

use crate::{client::MapboxApiClient, ApiError};

/* - MAPBOX DIRECTIONS API - */

#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsRoute {
    pub geometry: Geometry,
    /// Route length in meters.
    pub distance: f64,
    /// Travel time in seconds.
    pub duration: f64,
}

/// A computed route: the line to draw plus the figures to display.
#[derive(Debug, Clone)]
pub struct ComputedRoute {
    pub geometry: Geometry,
    pub info: RouteInfo,
}

/// The best route between two coordinates for the given travel mode.
/// An empty `routes` array answers as [`ApiError::NoRouteFound`].
pub async fn get_route(
    client: Arc<MapboxApiClient>,
    origin: &Coordinates,
    destination: &Coordinates,
    profile: RoutingProfile,
) -> Result<ComputedRoute, ApiError> {
    let endpoint = format!(
        "directions/v5/mapbox/{}/{};{}",
        profile.as_str(),
        origin.query_value(),
        destination.query_value(),
    );

    let response: DirectionsResponse = client
        .get(&endpoint, &[("geometries", "geojson".to_owned())])
        .await?;

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(ApiError::NoRouteFound)?;

    Ok(ComputedRoute {
        info: RouteInfo::from_meters_seconds(route.distance, route.duration),
        geometry: route.geometry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::client::MapboxCredentials;

    fn test_client(server: &MockServer) -> Arc<MapboxApiClient> {
        let credentials = MapboxCredentials {
            access_token: "test-token".to_owned(),
            rate_limit_per_minute: None,
            proxy: None,
        };
        Arc::new(MapboxApiClient::new(&credentials).with_base_url(server.uri()))
    }

    #[tokio::test]
    async fn picks_the_first_route_and_converts_units() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/directions/v5/mapbox/driving/139.76,35.676;139.7670516,35.6811673",
            ))
            .and(query_param("geometries", "geojson"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "routes": [{
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[139.76, 35.676], [139.7670516, 35.6811673]]
                    },
                    "distance": 4517.0,
                    "duration": 738.0
                }]
            })))
            .mount(&server)
            .await;

        let route = get_route(
            test_client(&server),
            &Coordinates::new(139.76, 35.676),
            &Coordinates::FALLBACK,
            RoutingProfile::Driving,
        )
        .await
        .unwrap();

        assert_eq!(route.info.distance_km, 4.52);
        assert_eq!(route.info.duration_min, 12.3);
        assert!(matches!(route.geometry, Geometry::LineString { .. }));
    }

    #[tokio::test]
    async fn empty_routes_answer_as_no_route_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "routes": [] })),
            )
            .mount(&server)
            .await;

        let result = get_route(
            test_client(&server),
            &Coordinates::new(139.76, 35.676),
            &Coordinates::FALLBACK,
            RoutingProfile::Walking,
        )
        .await;
        assert!(matches!(result, Err(ApiError::NoRouteFound)));
    }
}
