use super::metrics::MetricsRegistry;
use super::SubmissionMetrics;
use crate::error::ErrorKind;
use axum::{
    body::Body,
    extract::State,
    http::{header::CONTENT_LENGTH, Request, Response},
    middleware::Next,
};
use std::{sync::Arc, time::Instant};
use tracing::debug;

/// Times every request and hands the result to the registry. The upload body
/// is never buffered here; its size comes from `content-length`.
pub async fn metrics_middleware(
    State(registry): State<Arc<MetricsRegistry>>,
    req: Request<Body>,
    next: Next,
) -> Response<Body> {
    let start = Instant::now();

    let path = req.uri().path().to_string();
    let method = req.method().to_string();
    let request_size = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    debug!("Received request: path={}, method={}, size={}", path, method, request_size);

    let response = next.run(req).await;

    let metrics = SubmissionMetrics {
        path,
        method,
        total_latency: start.elapsed(),
        request_size,
        status_code: response.status().as_u16(),
        error_kind: response.extensions().get::<ErrorKind>().copied(),
    };

    registry.record_metrics(metrics).await;

    response
}
