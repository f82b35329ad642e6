use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use serde::Deserialize;

use mapbox::search::{search_category, search_places, SearchOptions};
use model::{
    place::{Coordinates, Place},
    WithDistance, WithId,
};

use crate::{
    common::{
        route_not_found, schema, HateoasResult, RouteErrorResponse, VecResponse,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/places{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

/// Search radius used when the client does not pass one, matching the
/// slider default of the map controls.
const DEFAULT_RADIUS_KM: f64 = 15.0;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Place>))
        .route("/search", get(search))
        .route("/category/:category", get(category))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuery {
    q: String,
    latitude: f64,
    longitude: f64,
    radius_km: Option<f64>,
}

async fn search(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { mapbox_client, .. }): State<WebState>,
    Query(params): Query<SearchQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithDistance<WithId<Place>>>>> {
    let center = Coordinates::new(params.longitude, params.latitude);
    let options = SearchOptions {
        query: params.q,
        radius_km: params.radius_km.unwrap_or(DEFAULT_RADIUS_KM),
        center,
    };

    let started = Instant::now();
    let places = search_places(mapbox_client, &options).await.map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })?;
    let search_elapsed = started.elapsed();

    let data = places
        .into_iter()
        .map(|place| place_hateoas(place, &center, base_url.clone()))
        .collect::<Vec<_>>();

    Ok(hateoas::Response::builder(VecResponse::new(data), base_url)
        .debug_info("searchSecs", search_elapsed.as_secs_f64())
        .link("cost-comparison", super::comparison::resource!(""))
        .build()
        .json())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryQuery {
    latitude: f64,
    longitude: f64,
    radius_km: Option<f64>,
}

async fn category(
    OriginalUri(original_uri): OriginalUri,
    Path(category_name): Path<String>,
    State(WebState { mapbox_client, .. }): State<WebState>,
    Query(params): Query<CategoryQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithDistance<WithId<Place>>>>> {
    let center = Coordinates::new(params.longitude, params.latitude);
    let options = SearchOptions {
        query: category_name,
        radius_km: params.radius_km.unwrap_or(DEFAULT_RADIUS_KM),
        center,
    };

    let started = Instant::now();
    let places = search_category(mapbox_client, &options)
        .await
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })?;
    let search_elapsed = started.elapsed();

    let data = places
        .into_iter()
        .map(|place| place_hateoas(place, &center, base_url.clone()))
        .collect::<Vec<_>>();

    Ok(hateoas::Response::builder(VecResponse::new(data), base_url)
        .debug_info("searchSecs", search_elapsed.as_secs_f64())
        .link("cost-comparison", super::comparison::resource!(""))
        .build()
        .json())
}

/// Wrap a found place with its straight-line distance from the search
/// center and links to the route and reachability resources towards it.
fn place_hateoas(
    place: WithId<Place>,
    center: &Coordinates,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithDistance<WithId<Place>>> {
    let location = place.content.location;
    let distance_km = center.distance_to(&location);

    hateoas::Response::builder(WithDistance::new(distance_km, place), base_url)
        .link(
            "directions",
            super::directions::resource!(
                "?fromLatitude={}&fromLongitude={}&toLatitude={}&toLongitude={}",
                center.latitude,
                center.longitude,
                location.latitude,
                location.longitude
            ),
        )
        .link(
            "reachability",
            super::isochrones::resource!(
                "?latitude={}&longitude={}",
                location.latitude,
                location.longitude
            ),
        )
        .build()
}
