use std::env;

use serde::Deserialize;
use serde::Serialize;

use tokio::sync::RwLock;

use chrono::Local;

use crate::ApiError;

pub const MAPBOX_API_URL: &str = "https://api.mapbox.com";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapboxCredentials {
    pub access_token: String,
    pub rate_limit_per_minute: Option<u64>,
    pub proxy: Option<String>,
}

impl MapboxCredentials {
    pub fn env() -> Self {
        let access_token =
            env::var("MAPBOX_ACCESS_TOKEN").expect("Expected Mapbox access token.");
        let rate_limit_per_minute = env::var("MAPBOX_RATE_LIMIT_PER_MINUTE")
            .ok()
            .and_then(|value| value.parse().ok());
        let proxy = env::var("MAPBOX_PROXY").ok();

        Self {
            access_token,
            rate_limit_per_minute,
            proxy,
        }
    }
}

struct MapboxApiClientState {
    pub available_requests: u64,
    pub last_refill: chrono::DateTime<Local>,
}

pub struct MapboxApiClient {
    pub credentials: MapboxCredentials,
    base_url: String,
    state: RwLock<MapboxApiClientState>,
}

impl MapboxApiClient {
    pub fn new(credentials: &MapboxCredentials) -> Self {
        Self {
            credentials: credentials.clone(),
            base_url: MAPBOX_API_URL.to_owned(),
            state: RwLock::new(MapboxApiClientState {
                available_requests: credentials.rate_limit_per_minute.unwrap_or(0),
                last_refill: chrono::offset::Local::now(),
            }),
        }
    }

    /// Point the client at a different API host. Used by the tests to talk
    /// to a scripted server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn available_requests(&self) -> u64 {
        self.state.read().await.available_requests
    }

    async fn try_decrement_available_requests(&self) -> Result<(), ApiError> {
        if let Some(rate_limit_minutes) = self.credentials.rate_limit_per_minute {
            let mut state = self.state.write().await;

            let minutes_since_last_refill =
                (chrono::offset::Local::now() - state.last_refill).num_minutes();
            if minutes_since_last_refill >= 1 {
                state.available_requests = rate_limit_minutes;
                state.last_refill = chrono::offset::Local::now();
            }

            if state.available_requests != 0 {
                state.available_requests -= 1;
            } else {
                return Err(ApiError::RateLimitReached);
            }
        }
        Ok(())
    }

    /// Fetch data from an endpoint using this client. The access token is
    /// appended to the given query parameters.
    pub async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.try_decrement_available_requests().await?;

        /* build a new http client with optional proxy */
        let client = if let Some(proxy_url) = &self.credentials.proxy {
            log::debug!("Requesting endpoint '{endpoint}' using proxy '{proxy_url}'.");
            reqwest::Client::builder()
                .proxy(reqwest::Proxy::all(proxy_url)?)
                .build()?
        } else {
            log::debug!("Requesting endpoint '{endpoint}'.");
            reqwest::Client::new()
        };

        /* perform get-request */
        let url = format!("{}/{endpoint}", self.base_url);
        let response = client
            .get(&url)
            .query(query)
            .query(&[("access_token", &self.credentials.access_token)])
            .send()
            .await?;

        /* parse response */
        match response.status() {
            reqwest::StatusCode::OK => Ok(response.json().await?),
            other => match response.text().await {
                Ok(val) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: Some(val),
                }),
                Err(_) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: None,
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Pong {
        message: String,
    }

    fn credentials(rate_limit: Option<u64>) -> MapboxCredentials {
        MapboxCredentials {
            access_token: "test-token".to_owned(),
            rate_limit_per_minute: rate_limit,
            proxy: None,
        }
    }

    #[tokio::test]
    async fn get_appends_the_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(query_param("access_token", "test-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "message": "pong"
                })),
            )
            .mount(&server)
            .await;

        let client =
            MapboxApiClient::new(&credentials(None)).with_base_url(server.uri());
        let pong: Pong = client.get("ping", &[]).await.unwrap();
        assert_eq!(pong.message, "pong");
    }

    #[tokio::test]
    async fn non_ok_status_becomes_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let client =
            MapboxApiClient::new(&credentials(None)).with_base_url(server.uri());
        let result: Result<Pong, ApiError> = client.get("broken", &[]).await;
        match result {
            Err(ApiError::InvalidResponse {
                status_code,
                response,
                ..
            }) => {
                assert_eq!(status_code, reqwest::StatusCode::UNAUTHORIZED);
                assert_eq!(response.as_deref(), Some("Unauthorized"));
            }
            other => panic!("expected InvalidResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limit_exhausts_after_the_budget() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "message": "pong"
                })),
            )
            .mount(&server)
            .await;

        let client =
            MapboxApiClient::new(&credentials(Some(2))).with_base_url(server.uri());
        assert!(client.get::<Pong>("ping", &[]).await.is_ok());
        assert!(client.get::<Pong>("ping", &[]).await.is_ok());
        match client.get::<Pong>("ping", &[]).await {
            Err(ApiError::RateLimitReached) => {}
            other => panic!("expected RateLimitReached, got {other:?}"),
        }
    }
}
