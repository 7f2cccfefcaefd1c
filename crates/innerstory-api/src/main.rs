//! Innerstory API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use innerstory_api::error::AppError;
use innerstory_api::routes;
use innerstory_api::state::AppState;
use innerstory_api::upstream::UpstreamModelClient;
use innerstory_core::clock::SystemClock;
use innerstory_throttle::ThrottleSet;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Innerstory API server");

    // Read configuration from environment.
    let api_url = std::env::var("MODEL_API_URL")
        .map_err(|_| AppError::Config("MODEL_API_URL environment variable must be set".into()))?;
    let api_key = std::env::var("MODEL_API_KEY")
        .map_err(|_| AppError::Config("MODEL_API_KEY environment variable must be set".into()))?;
    let model_name = std::env::var("MODEL_NAME").unwrap_or_else(|_| "gpt-4o-mini".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

    // Build application state.
    let model = Arc::new(UpstreamModelClient::new(api_url, api_key, model_name));
    let app_state = AppState::new(
        Arc::new(SystemClock),
        model,
        Arc::new(ThrottleSet::standard()),
    );

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/conversation", routes::conversation::router())
        .nest("/api/v1/admissions", routes::admissions::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
