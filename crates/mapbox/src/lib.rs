use phf::phf_map;
use std::error;
use std::fmt;
use std::sync::Arc;

use utility::geo::GeoError;

pub mod client;
pub mod directions;
pub mod isochrone;
pub mod search;

/// Normalize a user-facing category name into a lookup key: lowercased,
/// trimmed, spaces replaced with hyphens.
pub fn make_valid_category_key(category: &str) -> String {
    category.trim().to_lowercase().replace(' ', "-")
}

/// Translations from the names users actually type (including Japanese
/// aliases) to the canonical category ids of the Search Box category API.
pub static CATEGORY_TABLE: phf::Map<&'static str, &'static str> = phf_map! {
    "スーパー" => "grocery",
    "スーパーマーケット" => "grocery",
    "supermarket" => "grocery",
    "grocery-store" => "grocery",
    "コンビニ" => "convenience_store",
    "convenience-store" => "convenience_store",
    "薬局" => "pharmacy",
    "ドラッグストア" => "pharmacy",
    "drugstore" => "pharmacy",
};

/// The canonical category id for a user-facing category name. Unknown
/// names pass through normalized, the API reports them if they are invalid.
pub fn canonical_category(category: &str) -> String {
    let key = make_valid_category_key(category);
    match CATEGORY_TABLE.get(key.as_str()) {
        Some(canonical) => (*canonical).to_owned(),
        None => key,
    }
}

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    RateLimitReached,
    /// The Directions API answered without any route between the points.
    NoRouteFound,
    /// The search region could not be computed from the given center/radius.
    InvalidSearchRegion(GeoError),
    Other(String),
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response({}) {}", status_code, url),
            },
            ApiError::RateLimitReached => write!(f, "Rate limit reached."),
            ApiError::NoRouteFound => {
                write!(f, "No route exists between the requested coordinates.")
            }
            ApiError::InvalidSearchRegion(e) => {
                write!(f, "Invalid search region: {}", e)
            }
            ApiError::Other(e) => write!(f, "{e}"),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

impl From<GeoError> for ApiError {
    fn from(e: GeoError) -> Self {
        ApiError::InvalidSearchRegion(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_keys_are_normalized() {
        assert_eq!(make_valid_category_key("  Grocery Store "), "grocery-store");
        assert_eq!(make_valid_category_key("スーパー"), "スーパー");
    }

    #[test]
    fn aliases_map_to_canonical_categories() {
        assert_eq!(canonical_category("スーパー"), "grocery");
        assert_eq!(canonical_category("Supermarket"), "grocery");
        assert_eq!(canonical_category("Grocery Store"), "grocery");
        assert_eq!(canonical_category("ドラッグストア"), "pharmacy");
    }

    #[test]
    fn unknown_categories_pass_through_normalized() {
        assert_eq!(canonical_category("Hardware Store"), "hardware-store");
    }
}
