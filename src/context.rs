use std::sync::Arc;

use crate::{config::AppConfig, error::AppError, telemetry::MetricsRegistry, webhook::WebhookClient};

/// Shared by every handler. Holds no per-user data: the webhook URL and the
/// document travel with each submit and are dropped when it completes.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub webhook: WebhookClient,
    pub metrics: Arc<MetricsRegistry>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, metrics: Arc<MetricsRegistry>) -> Result<Self, AppError> {
        let webhook = WebhookClient::new(&config.webhook)?;
        Ok(Self {
            config,
            webhook,
            metrics,
        })
    }
}
