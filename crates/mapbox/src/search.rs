//! Place search against the Mapbox Search Box API, in the two flavors the
//! map front end uses: free-text suggest/retrieve and category search.

use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use model::{
    place::{Coordinates, Place},
    WithId,
};
use utility::id::Id;

use crate::{canonical_category, client::MapboxApiClient, ApiError};

/* - MAPBOX SEARCH BOX API - */

/// What to look for and where. `radius_km` scopes the search through a
/// bounding box around the center.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    pub query: String,
    pub radius_km: f64,
    pub center: Coordinates,
}

#[derive(Debug, Deserialize)]
pub struct SuggestResponse {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
pub struct Suggestion {
    pub mapbox_id: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RetrieveResponse {
    #[serde(default)]
    pub features: Vec<SearchFeature>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryResponse {
    #[serde(default)]
    pub features: Vec<SearchFeature>,
}

#[derive(Debug, Deserialize)]
pub struct SearchFeature {
    pub id: Option<String>,
    pub geometry: model::geojson::Geometry,
    pub properties: SearchFeatureProperties,
}

#[derive(Debug, Deserialize)]
pub struct SearchFeatureProperties {
    pub mapbox_id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub full_address: Option<String>,
    pub category: Option<String>,
    pub place_type: Option<String>,
}

impl SearchFeature {
    /// Convert a returned feature into a place. Features without a point
    /// geometry are dropped; a missing id is replaced with a random one.
    fn into_place(self, fallback_name: &str) -> Option<WithId<Place>> {
        let [lng, lat] = self.geometry.point()?;
        let id = self
            .id
            .or(self.properties.mapbox_id)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let name = self
            .properties
            .name
            .unwrap_or_else(|| fallback_name.to_owned());
        let address = self.properties.address.or(self.properties.full_address);
        let category = self.properties.category.or(self.properties.place_type);

        Some(WithId::new(
            Id::new(id),
            Place {
                name,
                location: Coordinates::new(lng, lat),
                address,
                category,
            },
        ))
    }
}

/// Free-text search: one `suggest` call scoped by proximity and bounding
/// box, then a `retrieve` per suggestion for the coordinates. Suggestions
/// without a retrievable feature are skipped.
pub async fn search_places(
    client: Arc<MapboxApiClient>,
    options: &SearchOptions,
) -> Result<Vec<WithId<Place>>, ApiError> {
    let bbox = options.center.bounding_box(options.radius_km)?;
    let session_token = Uuid::new_v4().to_string();

    let suggest: SuggestResponse = client
        .get(
            "search/searchbox/v1/suggest",
            &[
                ("q", options.query.clone()),
                ("proximity", options.center.query_value()),
                ("bbox", bbox.query_value()),
                ("limit", "10".to_owned()),
                ("language", "ja".to_owned()),
                ("session_token", session_token.clone()),
            ],
        )
        .await?;

    if suggest.suggestions.is_empty() {
        log::info!("Search for '{}' returned no suggestions.", options.query);
        return Ok(vec![]);
    }

    /* retrieve each suggestion to get its coordinates */
    let mut places = vec![];
    for suggestion in suggest.suggestions {
        let retrieved: RetrieveResponse = client
            .get(
                &format!("search/searchbox/v1/retrieve/{}", suggestion.mapbox_id),
                &[("session_token", session_token.clone())],
            )
            .await?;

        let fallback_name = suggestion.name.unwrap_or_else(|| options.query.clone());
        places.extend(
            retrieved
                .features
                .into_iter()
                .take(1)
                .filter_map(|feature| feature.into_place(&fallback_name)),
        );
    }

    Ok(dedupe_places(places))
}

/// Category search: a single call listing every place of a canonical
/// category inside the bounding box.
pub async fn search_category(
    client: Arc<MapboxApiClient>,
    options: &SearchOptions,
) -> Result<Vec<WithId<Place>>, ApiError> {
    let bbox = options.center.bounding_box(options.radius_km)?;
    let category = canonical_category(&options.query);

    let response: CategoryResponse = client
        .get(
            &format!("search/searchbox/v1/category/{category}"),
            &[
                ("proximity", options.center.query_value()),
                ("bbox", bbox.query_value()),
                ("limit", "25".to_owned()),
                ("language", "ja".to_owned()),
            ],
        )
        .await?;

    let places = response
        .features
        .into_iter()
        .filter_map(|feature| feature.into_place(&options.query))
        .collect::<Vec<_>>();

    Ok(dedupe_places(places))
}

/// The retrieve step can hand back the same place for several suggestions,
/// keep the first occurrence of every id.
fn dedupe_places(places: Vec<WithId<Place>>) -> Vec<WithId<Place>> {
    places
        .into_iter()
        .unique_by(|place| place.id.clone())
        .collect()
}
