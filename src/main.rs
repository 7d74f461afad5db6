use tracing::{debug, error, info};

use proposal_architect::{build_router, build_state, config::AppConfig, init_tracing, shutdown_signal};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);
    info!("Configuration loaded");
    debug!(
        "port={}, host={}, max_upload_bytes={}, webhook_timeout={:?}",
        config.port, config.host, config.max_upload_bytes, config.webhook.timeout
    );

    let addr = config.bind_address();
    let state = match build_state(config).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialise application state: {}", e);
            std::process::exit(1);
        }
    };

    let app = build_router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Proposal Architect listening on {}", addr);

    debug!("Starting server with graceful shutdown");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|e| {
            error!("Server error: {}", e);
            std::process::exit(1);
        });
}
