use axum::{
    extract::{OriginalUri, Query, Request},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use mapbox::ApiError;
use model::{comparison::ComparisonError, ExampleData};
use schemars::{schema_for, schema_for_value, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::hateoas;

pub type RouteResult<O> = Result<O, RouteErrorResponse>;
pub type HateoasResult<O> = RouteResult<Json<hateoas::Response<O>>>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VecResponse<T> {
    pub data: Vec<T>,
    pub total_items: usize,
}

impl<T> VecResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            total_items: data.len(),
            data,
        }
    }

    pub fn hateoas(self) -> hateoas::Response<Self> {
        hateoas::Response::new(self)
    }

    pub fn json(self) -> Json<Self> {
        Json(self)
    }
}

// - Services returning commonly used responses -

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchemaParams {
    #[serde(default = "Default::default")]
    example_data: bool,
}

pub(crate) async fn schema<T: ExampleData + JsonSchema + Serialize>(
    Query(params): Query<SchemaParams>,
) -> impl IntoResponse {
    if params.example_data {
        Json(schema_for_value!(T::example_data()))
    } else {
        Json(schema_for!(T))
    }
}

pub(crate) async fn schema_no_example<T: JsonSchema>(
    Query(_params): Query<SchemaParams>,
) -> impl IntoResponse {
    Json(schema_for!(T))
}

pub(crate) async fn route_not_implemented(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    RouteErrorResponse::not_implemented(req.method(), original_uri.path())
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    RouteErrorResponse::not_found(req.method(), original_uri.path())
}

// - Commonly used responses -

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            http_method: None,
            requested_uri: None,
            message: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST).with_message(message)
    }

    pub fn not_implemented(method: &Method, uri: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_IMPLEMENTED)
            .with_method(method)
            .with_uri(uri)
            .with_default_message()
    }

    pub fn not_found(method: &Method, uri: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND)
            .with_method(method)
            .with_uri(uri)
            .with_default_message()
    }

    pub fn with_method(mut self, method: &Method) -> Self {
        self.http_method = Some(method.to_string());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.requested_uri = Some(uri.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_default_message(self) -> Self {
        let message = self
            .status_code
            .canonical_reason()
            .unwrap_or("i dunno what happened here :/");
        self.with_message(message)
    }
}

impl From<ApiError> for RouteErrorResponse {
    fn from(value: ApiError) -> Self {
        let status_code = match &value {
            ApiError::InvalidSearchRegion(_) => StatusCode::BAD_REQUEST,
            ApiError::NoRouteFound => StatusCode::NOT_FOUND,
            ApiError::RateLimitReached => StatusCode::TOO_MANY_REQUESTS,
            ApiError::RequestError(_)
            | ApiError::JsonError(_)
            | ApiError::InvalidResponse { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status_code).with_message(format!("{}", value))
    }
}

impl From<ComparisonError> for RouteErrorResponse {
    fn from(value: ComparisonError) -> Self {
        Self::bad_request(format!("{}", value))
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_sensible_status_codes() {
        assert_eq!(
            RouteErrorResponse::from(ApiError::NoRouteFound).status_code,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RouteErrorResponse::from(ApiError::RateLimitReached).status_code,
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            RouteErrorResponse::from(ApiError::Other("boom".to_owned())).status_code,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn comparison_errors_are_client_errors() {
        let error = ComparisonError::InvalidCostPerKm(-1.0);
        let response = RouteErrorResponse::from(error);
        assert_eq!(response.status_code, StatusCode::BAD_REQUEST);
        assert!(response.message.unwrap().contains("Cost per kilometer"));
    }

    #[test]
    fn vec_response_counts_its_items() {
        let response = VecResponse::new(vec![1, 2, 3]);
        assert_eq!(response.total_items, 3);
    }
}
