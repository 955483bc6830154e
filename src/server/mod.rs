pub mod handlers;

use crate::core::checker::GrammarChecker;
use crate::domain::ports::TextGenerator;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared, read-only per-process state. Requests never mutate it.
pub struct AppState<G: TextGenerator> {
    pub checker: Arc<GrammarChecker<G>>,
}

impl<G: TextGenerator> AppState<G> {
    pub fn new(checker: GrammarChecker<G>) -> Self {
        Self {
            checker: Arc::new(checker),
        }
    }
}

impl<G: TextGenerator> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            checker: Arc::clone(&self.checker),
        }
    }
}

pub fn router<G: TextGenerator + 'static>(state: AppState<G>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/check-grammar", post(handlers::check_grammar::<G>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve<G: TextGenerator + 'static>(
    listener: tokio::net::TcpListener,
    state: AppState<G>,
) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
