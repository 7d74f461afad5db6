use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::WebhookConfig;
use crate::error::AppError;
use crate::submission::{Document, ProposalRequest};

/// Longest slice of the endpoint's reply that is echoed back to the page.
pub const MAX_ECHOED_RESPONSE: usize = 2048;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// What the page gets back once the endpoint accepted a request.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub correlation_id: Uuid,
    pub endpoint_status: u16,
    pub endpoint_response: String,
    #[serde(serialize_with = "serialize_millis")]
    pub webhook_latency: Duration,
    pub accepted_at: DateTime<Utc>,
}

/// Outbound side of the tool. Wraps a pooled HTTP client whose overall and
/// connect timeouts bound every webhook call.
#[derive(Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
}

impl WebhookClient {
    pub fn new(config: &WebhookConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Posts the document once. Any 2xx counts as accepted; everything else is
    /// a rejection. No retry happens here, the user re-submits by hand.
    pub async fn submit(
        &self,
        endpoint: &Url,
        request: &ProposalRequest,
    ) -> Result<SubmissionReceipt, AppError> {
        let host = endpoint.host_str().unwrap_or("unknown");
        info!(
            endpoint_host = host,
            correlation_id = %request.correlation_id,
            filename = %request.document.filename,
            size = request.document.content.len(),
            reference_files = request.reference_files.len(),
            "Forwarding proposal request to webhook"
        );

        let form = build_form(request)?;
        let start = Instant::now();

        let response = self
            .client
            .post(endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                let err = AppError::from(e);
                error!(
                    endpoint_host = host,
                    correlation_id = %request.correlation_id,
                    timeout = matches!(err, AppError::Timeout),
                    "Webhook call failed: {}",
                    err
                );
                err
            })?;

        let status = response.status();
        let body = response.text().await.map_err(AppError::from)?;
        let webhook_latency = start.elapsed();
        let endpoint_response = truncate(&body, MAX_ECHOED_RESPONSE);

        debug!(
            endpoint_host = host,
            status = status.as_u16(),
            latency_ms = webhook_latency.as_millis() as u64,
            "Webhook responded"
        );

        if !status.is_success() {
            warn!(
                endpoint_host = host,
                correlation_id = %request.correlation_id,
                status = status.as_u16(),
                "Webhook rejected the request"
            );
            return Err(AppError::Rejected {
                status: status.as_u16(),
                body: endpoint_response,
            });
        }

        info!(
            endpoint_host = host,
            correlation_id = %request.correlation_id,
            status = status.as_u16(),
            "Webhook accepted the request"
        );

        Ok(SubmissionReceipt {
            correlation_id: request.correlation_id,
            endpoint_status: status.as_u16(),
            endpoint_response,
            webhook_latency,
            accepted_at: Utc::now(),
        })
    }
}

fn build_form(request: &ProposalRequest) -> Result<Form, AppError> {
    let mut form = Form::new()
        .part("file", file_part(&request.document)?)
        .text("filename", request.document.filename.clone())
        .text("correlation_id", request.correlation_id.to_string())
        .text("client", request.client_name.clone())
        .text("tone", request.tone.label());

    for service in &request.services {
        form = form.text("services", service.label());
    }
    for reference in &request.reference_files {
        form = form.part("reference_files", file_part(reference)?);
    }

    Ok(form)
}

fn file_part(document: &Document) -> Result<Part, AppError> {
    let body = reqwest::Body::from(document.content.clone());
    let part = Part::stream_with_length(body, document.content.len() as u64)
        .file_name(document.filename.clone());
    match document.content_type.as_deref() {
        Some(content_type) if !content_type.is_empty() => {
            part.mime_str(content_type).map_err(|_| {
                AppError::MalformedForm(format!(
                    "invalid content type `{}` for `{}`",
                    content_type, document.filename
                ))
            })
        }
        _ => Ok(part),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

fn serialize_millis<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_millis() as u64)
}
