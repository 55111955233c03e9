mod error;
mod routes;
mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("initializing price data SDK");
    let mut builder = price_data_sdk::AsyncPriceDataSdk::builder();
    if let Ok(path) = std::env::var("PRICE_DATA_DB") {
        builder = builder.db_path(path);
    }
    let sdk = builder
        .build()
        .await
        .expect("Failed to initialize price data SDK");

    let state = Arc::new(AppState { sdk });

    let app = Router::new()
        .route("/api/meta", get(routes::meta::get_meta))
        .route("/model-prices", post(routes::prices::model_prices))
        .route(
            "/generate-random-numbers",
            post(routes::random::generate_random_numbers),
        )
        .route(
            "/generate-flat-prices",
            post(routes::flat::generate_flat_prices),
        )
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = "0.0.0.0:3000";
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
