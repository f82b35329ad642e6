use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use mapbox::directions::get_route;
use model::{
    geojson::Geometry,
    place::Coordinates,
    route::{RouteInfo, RoutingProfile},
};

use crate::{
    common::{
        route_not_found, schema_no_example, HateoasResult, RouteErrorResponse,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/directions{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema_no_example::<RouteDto>))
        .route("/", get(directions))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectionsQuery {
    from_latitude: f64,
    from_longitude: f64,
    to_latitude: f64,
    to_longitude: f64,
    profile: Option<String>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct RouteDto {
    profile: RoutingProfile,
    origin: Coordinates,
    destination: Coordinates,
    info: RouteInfo,
    geometry: Geometry,
}

async fn directions(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { mapbox_client, .. }): State<WebState>,
    Query(params): Query<DirectionsQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<RouteDto> {
    let profile = match params.profile.as_deref() {
        Some(value) => value.parse::<RoutingProfile>().map_err(|why| {
            RouteErrorResponse::bad_request(format!("{}", why))
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })?,
        None => RoutingProfile::default(),
    };
    let origin = Coordinates::new(params.from_longitude, params.from_latitude);
    let destination = Coordinates::new(params.to_longitude, params.to_latitude);

    let route = get_route(mapbox_client, &origin, &destination, profile)
        .await
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })?;

    let dto = RouteDto {
        profile,
        origin,
        destination,
        info: route.info,
        geometry: route.geometry,
    };

    Ok(hateoas::Response::builder(dto, base_url)
        .link(
            "destination-reachability",
            super::isochrones::resource!(
                "?latitude={}&longitude={}&profile={}",
                destination.latitude,
                destination.longitude,
                profile
            ),
        )
        .build()
        .json())
}
