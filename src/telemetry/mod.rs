pub mod metrics;
pub mod middleware;
pub mod plugins;

pub use self::{
    metrics::{MetricsExporter, MetricsRegistry},
    middleware::metrics_middleware,
    plugins::ConsolePlugin,
};

use serde::Serialize;
use std::time::Duration;

use crate::error::ErrorKind;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SubmissionMetrics {
    // Request metadata
    pub path: String,
    pub method: String,

    // Timing
    pub total_latency: Duration,

    // Size
    pub request_size: usize,

    // Status
    pub status_code: u16,
    pub error_kind: Option<ErrorKind>,
}
