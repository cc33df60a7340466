//! End-to-end tests for the REST API, with the remote extraction service
//! replaced by a stub agent.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use finvoice_core::error::{FinvoiceError, FinvoiceResult};
use finvoice_core::schema::Invoice;
use finvoice_core::traits::ExtractionAgent;
use finvoice_server::{create_server, AppState};

/// Stub agent returning a canned invoice, or an authentication-style error.
struct StubAgent {
    fail: bool,
}

#[async_trait]
impl ExtractionAgent for StubAgent {
    async fn extract(&self, _image: &[u8], _filename: &str) -> FinvoiceResult<Invoice> {
        if self.fail {
            return Err(FinvoiceError::extraction(
                "HTTP 401 invalid API key",
            ));
        }

        Ok(serde_json::from_value(json!({
            "invoice_number": "INV-1",
            "seller": {"name": "Acme"},
            "summary": {"total_gross_worth": 100}
        }))
        .unwrap())
    }

    fn name(&self) -> &str {
        "stub_agent"
    }
}

fn test_app(fail: bool) -> (Router, AppState) {
    let state = AppState::new(Arc::new(StubAgent { fail }));
    (create_server(state.clone()), state)
}

const BOUNDARY: &str = "finvoice-test-boundary";

fn multipart_upload(filename: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/extract-invoice")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_reports_liveness() {
    let (app, _) = test_app(false);
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "finvoice API is running");
}

#[tokio::test]
async fn extract_invoice_builds_pending_record() {
    let (app, _) = test_app(false);
    let response = app
        .clone()
        .oneshot(multipart_upload("scan.jpg", "image/jpeg", b"fake-jpeg"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let record = body_json(response).await;
    assert_eq!(record["invoice_number"], "INV-1");
    assert_eq!(record["vendor_name"], "Acme");
    assert_eq!(record["display_amount"], "$100.00");
    assert_eq!(record["status"], "Pending");
    assert_eq!(record["source_filename"], "scan.jpg");
    assert_eq!(record["id"].as_str().unwrap().len(), 8);

    // The record is queryable afterwards
    let response = app
        .oneshot(
            Request::builder()
                .uri("/invoices")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let invoices = body_json(response).await;
    assert_eq!(invoices.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn extract_invoice_rejects_non_image() {
    let (app, state) = test_app(false);
    let response = app
        .oneshot(multipart_upload("notes.txt", "text/plain", b"hello"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "File must be an image");
    assert!(state.store.read().await.is_empty());
}

#[tokio::test]
async fn extraction_failure_leaves_store_untouched() {
    let (app, state) = test_app(true);
    let response = app
        .oneshot(multipart_upload("scan.jpg", "image/jpeg", b"fake-jpeg"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("invalid API key"));
    assert!(state.store.read().await.is_empty());
}

#[tokio::test]
async fn invoices_are_listed_newest_first() {
    let (app, _) = test_app(false);
    for filename in ["first.jpg", "second.jpg"] {
        let response = app
            .clone()
            .oneshot(multipart_upload(filename, "image/jpeg", b"fake-jpeg"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/invoices")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let invoices = body_json(response).await;
    let invoices = invoices.as_array().unwrap();
    assert_eq!(invoices[0]["source_filename"], "second.jpg");
    assert_eq!(invoices[1]["source_filename"], "first.jpg");
}

#[tokio::test]
async fn get_invoice_by_id() {
    let (app, _) = test_app(false);
    let response = app
        .clone()
        .oneshot(multipart_upload("scan.jpg", "image/jpeg", b"fake-jpeg"))
        .await
        .unwrap();
    let record = body_json(response).await;
    let id = record["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/invoices/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["id"], *id);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/invoices/no-such-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_status_changes_only_status() {
    let (app, _) = test_app(false);
    let response = app
        .clone()
        .oneshot(multipart_upload("scan.jpg", "image/jpeg", b"fake-jpeg"))
        .await
        .unwrap();
    let record = body_json(response).await;
    let id = record["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/invoices/{}/status", id))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"status": "Approved"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["status"], "Approved");
    assert_eq!(updated["id"], record["id"]);
    assert_eq!(updated["invoice_number"], record["invoice_number"]);
    assert_eq!(updated["vendor_name"], record["vendor_name"]);
    assert_eq!(updated["display_amount"], record["display_amount"]);
    assert_eq!(updated["created_at"], record["created_at"]);
}

#[tokio::test]
async fn update_status_rejects_unknown_vocabulary() {
    let (app, _) = test_app(false);
    let response = app
        .clone()
        .oneshot(multipart_upload("scan.jpg", "image/jpeg", b"fake-jpeg"))
        .await
        .unwrap();
    let record = body_json(response).await;
    let id = record["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/invoices/{}/status", id))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"status": "Reimbursed"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn update_status_missing_id_is_404() {
    let (app, _) = test_app(false);
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/invoices/no-such-id/status")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"status": "Approved"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
