use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use mapbox::isochrone::get_isochrone;
use model::{
    geojson::{FeatureCollection, IsochroneProperties},
    place::Coordinates,
    route::RoutingProfile,
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
        crate::api::v1::resource!("/isochrones{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

/// Contour bounds of the travel time slider in the map controls.
const MIN_CONTOUR_MINUTES: u32 = 5;
const MAX_CONTOUR_MINUTES: u32 = 60;
const DEFAULT_CONTOUR_MINUTES: u32 = 10;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema_no_example::<IsochroneDto>))
        .route("/", get(isochrones))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IsochroneQuery {
    latitude: f64,
    longitude: f64,
    minutes: Option<u32>,
    profile: Option<String>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct IsochroneDto {
    center: Coordinates,
    minutes: u32,
    profile: RoutingProfile,
    contours: FeatureCollection<IsochroneProperties>,
}

async fn isochrones(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { mapbox_client, .. }): State<WebState>,
    Query(params): Query<IsochroneQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<IsochroneDto> {
    let minutes = params.minutes.unwrap_or(DEFAULT_CONTOUR_MINUTES);
    if !(MIN_CONTOUR_MINUTES..=MAX_CONTOUR_MINUTES).contains(&minutes) {
        return Err(RouteErrorResponse::bad_request(format!(
            "Contour time must be between {MIN_CONTOUR_MINUTES} and {MAX_CONTOUR_MINUTES} minutes, got {minutes}."
        ))
        .with_method(&Method::GET)
        .with_uri(original_uri.path()));
    }

    let profile = match params.profile.as_deref() {
        Some(value) => value.parse::<RoutingProfile>().map_err(|why| {
            RouteErrorResponse::bad_request(format!("{}", why))
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })?,
        None => RoutingProfile::default(),
    };
    let center = Coordinates::new(params.longitude, params.latitude);

    let contours = get_isochrone(mapbox_client, &center, minutes, profile)
        .await
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })?;

    let dto = IsochroneDto {
        center,
        minutes,
        profile,
        contours,
    };

    Ok(hateoas::Response::builder(dto, base_url)
        .link(
            "nearby-supermarkets",
            super::places::resource!(
                "/category/supermarket?latitude={}&longitude={}",
                center.latitude,
                center.longitude
            ),
        )
        .build()
        .json())
}
