use std::sync::Arc;

use mapbox::client::{MapboxApiClient, MapboxCredentials};
use web::{start_web_server, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    // mapbox client
    let credentials = MapboxCredentials::env();
    let mapbox_client = Arc::new(MapboxApiClient::new(&credentials));

    // web server
    let web_future = start_web_server(WebState { mapbox_client });

    let _ = web_future.await;
}
