use std::sync::Arc;

use axum::{
    extract::OriginalUri,
    http::Method,
    routing::{get, on, post},
    Extension, Json, Router,
};
use schemars::JsonSchema;
use serde::Deserialize;

use model::comparison::{rank_places, PriceEntry, Ranking, StoreCandidate};

use crate::{
    common::{
        route_not_found, schema, schema_no_example, HateoasResult,
        RouteErrorResponse, METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/comparison{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Ranking>))
        .route("/request/schema", get(schema_no_example::<ComparisonRequest>))
        .route("/", post(compare))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// The user-edited comparison table: the stores under comparison, the
/// price rows (one slot per store, in store order) and the surcharge rate.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ComparisonRequest {
    places: Vec<StoreCandidate>,
    prices: Vec<PriceEntry>,
    cost_per_km: f64,
}

async fn compare(
    OriginalUri(original_uri): OriginalUri,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(request): Json<ComparisonRequest>,
) -> HateoasResult<Ranking> {
    let ranking = rank_places(&request.places, &request.prices, request.cost_per_km)
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })?;

    let cheapest_id = ranking
        .cheapest_summary()
        .map(|summary| summary.place_id.clone());

    let mut builder = hateoas::Response::builder(ranking, base_url);
    if let Some(id) = cheapest_id {
        builder = builder.debug_info("cheapestPlaceId", id);
    }

    Ok(builder.build().json())
}
