use std::fmt::Debug;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use serde_with;
use utility::id::{HasId, Id};

pub mod comparison;
pub mod geojson;
pub mod place;
pub mod route;

/// Example payloads for the generated JSON schemas.
pub trait ExampleData {
    fn example_data() -> Self;
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithDistance<T> {
    pub distance_km: f64,
    #[serde(flatten)]
    pub content: T,
}

impl<T> WithDistance<T> {
    pub fn new(distance_km: f64, content: T) -> Self {
        Self {
            distance_km,
            content,
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub id: Id<V>,
    #[serde(flatten)]
    pub content: V,
}

impl<V> WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub fn new(id: Id<V>, content: V) -> Self {
        Self { id, content }
    }
}
