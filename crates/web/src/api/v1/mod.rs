use std::sync::Arc;

use axum::{
    extract::OriginalUri,
    routing::{get, on},
    Extension, Router,
};
use schemars::JsonSchema;
use serde::Serialize;

use model::place::Coordinates;

use crate::{
    common::{
        route_not_found, route_not_implemented, schema_no_example, HateoasResult,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

mod comparison;
mod directions;
mod isochrones;
mod places;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::resource!("/v1{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(route_not_implemented))
        .route("/location/fallback", get(fallback_location))
        .route(
            "/location/fallback/schema",
            get(schema_no_example::<FallbackLocationDto>),
        )
        .nest_service("/places", places::routes(state.clone()))
        .nest_service("/directions", directions::routes(state.clone()))
        .nest_service("/isochrones", isochrones::routes(state.clone()))
        .nest_service("/comparison", comparison::routes(state.clone()))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// The position clients should fall back to when device geolocation is
/// unavailable or denied: Tokyo Station.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct FallbackLocationDto {
    location: Coordinates,
    source: String,
}

async fn fallback_location(
    OriginalUri(_original_uri): OriginalUri,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<FallbackLocationDto> {
    let location = Coordinates::FALLBACK;
    let dto = FallbackLocationDto {
        location,
        source: "fallback".to_owned(),
    };

    Ok(hateoas::Response::builder(dto, base_url)
        .link(
            "nearby-supermarkets",
            places::resource!(
                "/category/supermarket?latitude={}&longitude={}",
                location.latitude,
                location.longitude
            ),
        )
        .link(
            "reachability",
            isochrones::resource!(
                "?latitude={}&longitude={}",
                location.latitude,
                location.longitude
            ),
        )
        .build()
        .json())
}
