//! Proposal Architect: a one-page form that forwards an RFP/RFI document to a
//! user-supplied automation webhook.

pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod page;
pub mod submission;
pub mod telemetry;
pub mod webhook;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::{AppConfig, LogFormat},
    context::AppState,
    error::AppError,
    telemetry::{metrics_middleware, ConsolePlugin, MetricsRegistry},
};

pub fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    );
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Compact => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}

/// Builds the shared state, registering the console exporter in debug mode.
pub async fn build_state(config: AppConfig) -> Result<Arc<AppState>, AppError> {
    let config = Arc::new(config);
    debug!(
        "Telemetry configuration: debug_mode={}",
        config.telemetry.debug_mode
    );

    let metrics_registry = Arc::new(MetricsRegistry::new(config.telemetry.debug_mode));
    if config.telemetry.debug_mode {
        debug!("Registering Console plugin for metrics");
        metrics_registry
            .register_exporter(Box::new(ConsolePlugin::new()))
            .await;
    }

    Ok(Arc::new(AppState::new(config, metrics_registry)?))
}

/// The page is served from the same origin as `/submit`, so no CORS layer is
/// installed: other origins must not be able to read webhook replies.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/submit", post(handlers::submit))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(from_fn_with_state(
            state.metrics.clone(),
            metrics_middleware,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn shutdown_signal() {
    info!("Registering shutdown signal handler");
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL+C signal handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            debug!("CTRL+C signal received");
        },
        _ = terminate => {
            debug!("Terminate signal received");
        },
    }
    info!("Shutdown signal received, starting graceful shutdown");
}
