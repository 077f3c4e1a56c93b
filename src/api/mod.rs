//! HTTP API
//!
//! Routes, CORS and graceful shutdown for the MarketLens backend.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tokio::{
    net::TcpListener,
    signal::{self, ctrl_c},
};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tracing::{info, warn};

pub mod error;
pub mod routes;
pub mod state;

use crate::config::DEFAULT_ALLOWED_ORIGIN;
use routes::{
    adjust_stock_handler, calculate_cost_handler, create_project_handler, delete_project_handler,
    get_project_handler, list_projects_handler, market_radar_handler, root_handler,
    search_handler, status_handler, update_project_handler,
};
use state::State;

pub use error::AppError;

fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let origin = HeaderValue::from_str(allowed_origin).unwrap_or_else(|e| {
        warn!("Invalid allowed origin '{allowed_origin}': {e}, using {DEFAULT_ALLOWED_ORIGIN}");
        HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN)
    });

    // Credentialed CORS cannot use wildcards, so methods and headers are mirrored
    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .max_age(Duration::from_secs(60 * 60))
}

/// Build the application router
pub fn router(state: Arc<State>) -> Router {
    let cors = cors_layer(&state.config.allowed_origin);

    Router::new()
        .route("/", get(root_handler))
        .route("/api/calculate-cost", post(calculate_cost_handler))
        .route("/api/search", get(search_handler))
        .route("/api/market-radar", get(market_radar_handler))
        .route("/api/status", get(status_handler))
        .route(
            "/api/projects",
            get(list_projects_handler).post(create_project_handler),
        )
        .route(
            "/api/projects/:id",
            get(get_project_handler)
                .put(update_project_handler)
                .delete(delete_project_handler),
        )
        .route("/api/projects/:id/stock", post(adjust_stock_handler))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until Ctrl+C or SIGTERM
pub async fn serve(state: Arc<State>) -> std::io::Result<()> {
    let address = state.config.address();
    let app = router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
