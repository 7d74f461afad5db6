use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    context::AppState,
    error::AppError,
    page,
    submission::{Document, SubmissionForm},
    webhook::SubmissionReceipt,
};

pub const FOLLOW_UP: &str =
    "The finished Word document will be saved to your DACTA_AI_Reference folder in Google Drive.";

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub status: &'static str,
    pub message: String,
    pub follow_up: &'static str,
    #[serde(flatten)]
    pub receipt: SubmissionReceipt,
}

pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn index() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<SubmitResponse>, AppError> {
    let form = read_form(multipart).await?;

    let (endpoint, request) = form.into_request().map_err(|e| {
        warn!("Submission rejected before calling the webhook: {}", e);
        e
    })?;

    let receipt = state.webhook.submit(&endpoint, &request).await?;

    Ok(Json(SubmitResponse {
        status: "accepted",
        message: format!(
            "Successfully triggered! AI is drafting the proposal for {}.",
            request.client_name
        ),
        follow_up: FOLLOW_UP,
        receipt,
    }))
}

async fn read_form(mut multipart: Multipart) -> Result<SubmissionForm, AppError> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "webhook_url" => form.webhook_url = field.text().await?,
            "client_name" => form.client_name = field.text().await?,
            "services" => form.services.push(field.text().await?),
            "tone" => form.tone = Some(field.text().await?),
            "rfp_file" => form.rfp_file = Some(read_document(field).await?),
            "reference_files" => form.reference_files.push(read_document(field).await?),
            other => debug!("Ignoring unknown form field `{}`", other),
        }
    }

    Ok(form)
}

async fn read_document(field: Field<'_>) -> Result<Document, AppError> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);
    let content = field.bytes().await?;
    debug!(filename = %filename, size = content.len(), "Read uploaded document");

    Ok(Document::new(filename, content_type, content))
}
