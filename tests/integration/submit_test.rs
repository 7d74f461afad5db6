use axum::http::StatusCode;
use reqwest::multipart::{Form, Part};

use super::common::{
    complete_form, post_form, rfp_part, start_app, test_config, unreachable_url, MockWebhook,
    RFP_BYTES,
};

#[test_log::test(tokio::test)]
async fn test_submit_forwards_document_and_metadata() {
    let webhook = MockWebhook::start().await;
    let app = start_app(test_config()).await;

    let (status, body) = post_form(&app, complete_form(&webhook.url("/accept"))).await;

    assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
    assert_eq!(body["status"], "accepted");
    assert_eq!(
        body["message"],
        "Successfully triggered! AI is drafting the proposal for SG Bank."
    );
    assert_eq!(body["endpoint_status"], 200);
    assert_eq!(body["endpoint_response"], "Accepted");

    let calls = webhook.calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];

    assert_eq!(call.files.len(), 1);
    assert_eq!(call.files[0].field, "file");
    assert_eq!(call.files[0].filename, "client-rfp.pdf");
    assert_eq!(call.files[0].content, RFP_BYTES);

    assert_eq!(call.field("filename"), Some("client-rfp.pdf"));
    assert_eq!(call.field("client"), Some("SG Bank"));
    assert_eq!(call.field("tone"), Some("Consultative"));
    assert_eq!(
        call.fields.get("services").cloned().unwrap_or_default(),
        vec![
            "Managed Detection & Response (MDR)".to_string(),
            "Digital Forensics (DFIR)".to_string()
        ]
    );
    assert_eq!(
        call.field("correlation_id"),
        body["correlation_id"].as_str()
    );
}

#[test_log::test(tokio::test)]
async fn test_submit_forwards_reference_files() {
    let webhook = MockWebhook::start().await;
    let app = start_app(test_config()).await;

    let form = complete_form(&webhook.url("/accept")).part(
        "reference_files",
        Part::bytes(b"%PDF partner spec".to_vec()).file_name("partner.pdf"),
    );
    let (status, _) = post_form(&app, form).await;
    assert_eq!(status, StatusCode::OK);

    let calls = webhook.calls();
    let references: Vec<_> = calls[0]
        .files
        .iter()
        .filter(|f| f.field == "reference_files")
        .collect();
    assert_eq!(references.len(), 1);
    assert_eq!(references[0].filename, "partner.pdf");
}

#[test_log::test(tokio::test)]
async fn test_empty_webhook_url_never_calls_out() {
    let webhook = MockWebhook::start().await;
    let app = start_app(test_config()).await;

    let (status, body) = post_form(&app, complete_form("  ")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "input");
    assert_eq!(body["error"]["type"], "MissingEndpoint");
    assert!(webhook.calls().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_missing_file_never_calls_out() {
    let webhook = MockWebhook::start().await;
    let app = start_app(test_config()).await;

    let form = Form::new()
        .text("webhook_url", webhook.url("/accept"))
        .text("client_name", "SG Bank")
        .part("rfp_file", Part::bytes(Vec::new()).file_name(""));
    let (status, body) = post_form(&app, form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "MissingFile");
    assert!(webhook.calls().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_missing_client_name_never_calls_out() {
    let webhook = MockWebhook::start().await;
    let app = start_app(test_config()).await;

    let form = Form::new()
        .text("webhook_url", webhook.url("/accept"))
        .part("rfp_file", rfp_part());
    let (status, body) = post_form(&app, form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "MissingClientName");
    assert!(webhook.calls().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_unsupported_file_type_never_calls_out() {
    let webhook = MockWebhook::start().await;
    let app = start_app(test_config()).await;

    let form = Form::new()
        .text("webhook_url", webhook.url("/accept"))
        .text("client_name", "SG Bank")
        .part(
            "rfp_file",
            Part::bytes(b"MZ".to_vec()).file_name("installer.exe"),
        );
    let (status, body) = post_form(&app, form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "UnsupportedFileType");
    assert!(webhook.calls().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_rejection_is_distinct_from_transport_error() {
    let webhook = MockWebhook::start().await;
    let app = start_app(test_config()).await;

    let (status, rejected) = post_form(&app, complete_form(&webhook.url("/reject"))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(rejected["error"]["kind"], "rejection");
    assert_eq!(rejected["error"]["endpoint_status"], 500);
    assert_eq!(rejected["error"]["endpoint_response"], "Scenario is turned off");

    let (status, unreachable) = post_form(&app, complete_form(&unreachable_url().await)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(unreachable["error"]["kind"], "transport");
    assert_eq!(unreachable["error"]["type"], "Transport");

    assert_ne!(rejected["error"]["message"], unreachable["error"]["message"]);
}

#[test_log::test(tokio::test)]
async fn test_slow_webhook_times_out_as_transport_error() {
    let webhook = MockWebhook::start().await;
    let app = start_app(test_config()).await;

    let (status, body) = post_form(&app, complete_form(&webhook.url("/slow"))).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"]["kind"], "transport");
    assert_eq!(body["error"]["type"], "Timeout");
}

#[test_log::test(tokio::test)]
async fn test_repeated_submits_are_independent() {
    let webhook = MockWebhook::start().await;
    let app = start_app(test_config()).await;

    let (first_status, first) = post_form(&app, complete_form(&webhook.url("/accept"))).await;
    let (second_status, second) = post_form(&app, complete_form(&webhook.url("/accept"))).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(webhook.calls().len(), 2);
    assert_ne!(first["correlation_id"], second["correlation_id"]);
}

#[test_log::test(tokio::test)]
async fn test_oversized_upload_is_refused() {
    let webhook = MockWebhook::start().await;
    let app = start_app(test_config()).await;

    let form = Form::new()
        .text("webhook_url", webhook.url("/accept"))
        .text("client_name", "SG Bank")
        .part(
            "rfp_file",
            Part::bytes(vec![b'a'; 96 * 1024]).file_name("huge.txt"),
        );
    let (status, body) = post_form(&app, form).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["type"], "PayloadTooLarge");
    assert!(webhook.calls().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_cross_origin_callers_get_no_cors_grant() {
    let webhook = MockWebhook::start().await;
    let app = start_app(test_config()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/submit", app))
        .header(reqwest::header::ORIGIN, "https://evil.example")
        .multipart(complete_form(&webhook.url("/accept")))
        .send()
        .await
        .unwrap();
    assert!(response
        .headers()
        .get(reqwest::header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());

    let preflight = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/submit", app))
        .header(reqwest::header::ORIGIN, "https://evil.example")
        .header(reqwest::header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .send()
        .await
        .unwrap();
    assert!(preflight
        .headers()
        .get(reqwest::header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[test_log::test(tokio::test)]
async fn test_empty_webhook_url_is_reported_before_unknown_tone() {
    let webhook = MockWebhook::start().await;
    let app = start_app(test_config()).await;

    let form = Form::new()
        .text("webhook_url", "")
        .text("client_name", "SG Bank")
        .text("tone", "Casual")
        .part("rfp_file", rfp_part());
    let (status, body) = post_form(&app, form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "MissingEndpoint");
    assert!(webhook.calls().is_empty());
}
