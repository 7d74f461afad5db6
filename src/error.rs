use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Please enter your Make.com Webhook URL in the sidebar.")]
    MissingEndpoint,

    #[error("The webhook URL is not a valid http(s) URL: {0}")]
    InvalidEndpoint(String),

    #[error("An RFP file is required to start.")]
    MissingFile,

    #[error("Client name is required to start.")]
    MissingClientName,

    #[error("Unsupported file type for `{filename}`; expected one of: {allowed}")]
    UnsupportedFileType { filename: String, allowed: String },

    #[error("Could not read the submitted form: {0}")]
    MalformedForm(String),

    #[error("Upload exceeds the size limit")]
    PayloadTooLarge,

    #[error("The webhook did not answer in time; the file is still selected, try again.")]
    Timeout,

    #[error("Could not reach the webhook: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Error: {status} - the webhook rejected the request.")]
    Rejected { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification shown to the page so it can tell an unreachable
/// endpoint from one that answered with a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Input,
    Transport,
    Rejection,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::MissingEndpoint
            | AppError::InvalidEndpoint(_)
            | AppError::MissingFile
            | AppError::MissingClientName
            | AppError::UnsupportedFileType { .. }
            | AppError::MalformedForm(_)
            | AppError::PayloadTooLarge => ErrorKind::Input,
            AppError::Timeout | AppError::Transport(_) => ErrorKind::Transport,
            AppError::Rejected { .. } => ErrorKind::Rejection,
            AppError::Config(_) => ErrorKind::Internal,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Transport(_) | AppError::Rejected { .. } => StatusCode::BAD_GATEWAY,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            AppError::MissingEndpoint => "MissingEndpoint",
            AppError::InvalidEndpoint(_) => "InvalidEndpoint",
            AppError::MissingFile => "MissingFile",
            AppError::MissingClientName => "MissingClientName",
            AppError::UnsupportedFileType { .. } => "UnsupportedFileType",
            AppError::MalformedForm(_) => "MalformedForm",
            AppError::PayloadTooLarge => "PayloadTooLarge",
            AppError::Timeout => "Timeout",
            AppError::Transport(_) => "Transport",
            AppError::Rejected { .. } => "Rejected",
            AppError::Config(_) => "Config",
        }
    }
}

/// The webhook URL is a secret, so it is stripped before the error is shown or logged.
impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AppError::Timeout
        } else {
            AppError::Transport(e.without_url())
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::MalformedForm(e.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut error = json!({
            "message": self.to_string(),
            "kind": self.kind(),
            "type": self.type_name(),
        });
        if let AppError::Rejected { status, body } = &self {
            error["endpoint_status"] = json!(status);
            error["endpoint_response"] = json!(body);
        }

        let mut response = (status, Json(json!({ "error": error }))).into_response();
        response.extensions_mut().insert(self.kind());
        response
    }
}
