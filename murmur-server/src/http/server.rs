//! Axum server setup
//!
//! Server skeleton with:
//! - Credentialed CORS for the configured client origin
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use murmur_core::AppConfig;

use crate::state::AppState;

use super::routes;

/// Build the application router with all routes.
///
/// The session cookie only flows when the browser origin is explicitly
/// allowed and credentials are enabled, so no wildcard origins here.
pub fn build_router(state: Arc<AppState>) -> Result<Router, ServerError> {
    let origin: HeaderValue = state
        .config
        .cors_origin
        .parse()
        .map_err(|_| ServerError::InvalidOrigin(state.config.cors_origin.clone()))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    Ok(Router::new()
        .merge(routes::health::router())
        .nest("/api/auth", routes::auth::router())
        .nest("/api/v1", routes::posts::router().merge(routes::users::router()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = db::create_pool(&config.database_url).await?;
/// run_server(pool, config).await?;
/// ```
pub async fn run_server(pool: PgPool, config: AppConfig) -> Result<(), ServerError> {
    let bind_addr = config.bind_addr;
    let state = Arc::new(AppState::new(pool, config));
    let app = build_router(state)?;

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid CORS origin '{0}'")]
    InvalidOrigin(String),
}
