use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::client::{HttpUastClient, UastClient};
use crate::config::ServerConfig;
use crate::language::LanguageDetector;

pub mod envelope;
pub mod routes;


pub use envelope::{Envelope, ErrorItem};

/// Server state, built once at startup and shared by every request
pub struct AppState {
    pub detector: LanguageDetector,
    pub client: Arc<dyn UastClient>,
}

impl AppState {
    pub fn new(detector: LanguageDetector, client: Arc<dyn UastClient>) -> Self {
        Self { detector, client }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/get-languages", get(routes::get_languages))
        .route("/detect-lang", post(routes::detect_lang))
        .route("/parse", post(routes::parse))
        .route("/filter", post(routes::filter))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(config: &ServerConfig) -> anyhow::Result<()> {
    let client = HttpUastClient::new(&config.uast_url, config.timeout)?;
    let state = Arc::new(AppState::new(LanguageDetector::new(), Arc::new(client)));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Forwarding parse requests to {}", config.uast_url);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
