//! Station Scheduling - Axum Server
//!
//! Run with: cargo run
//! Then open: http://localhost:7860

use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

use station_scheduling::api;
use station_scheduling::config::ServiceConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("station_scheduling=info".parse().unwrap()),
        )
        .init();

    let config = ServiceConfig::from_env();
    let addr = config.bind_addr;
    let cors = config.cors_layer();

    let state = Arc::new(api::AppState::new(config));
    let app = api::router(state)
        .fallback_service(ServeDir::new("static"))
        .layer(cors);

    println!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
