//! Integration tests for `POST /api/webhook`.
//!
//! Drives the full router: signature check, schema reconciliation and the
//! appended row, plus the acknowledgement contract on storage failure.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use checkout_sheets::adapters::google_sheets::SheetOperation;
use checkout_sheets::domain::submission::CellValue;
use checkout_sheets::ports::SheetError;

use common::{
    body_json, checkout_completed, data_target, empty_request, signed_webhook, TestApp,
};

// =============================================================================
// Verification
// =============================================================================

#[tokio::test]
async fn missing_signature_header_is_400() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/api/webhook")
        .body(Body::from(checkout_completed(json!({}))))
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Webhook Error:"));
    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn tampered_body_is_400_without_side_effects() {
    let app = TestApp::new();
    let payload = checkout_completed(json!({}));
    let mut request = signed_webhook(&payload);
    let mut tampered = payload.clone();
    tampered[10] ^= 0x01;
    *request.body_mut() = Body::from(tampered);

    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.store.rows(&data_target()).is_empty());
}

#[tokio::test]
async fn get_is_method_not_allowed() {
    let app = TestApp::new();

    let response = app.send(empty_request("GET", "/api/webhook")).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(response).await, json!({"error": "Method not allowed"}));
}

// =============================================================================
// Storage
// =============================================================================

#[tokio::test]
async fn completed_checkout_is_appended() {
    let app = TestApp::new();
    app.store.set_header(&data_target(), &["timestamp", "email"]);

    let response = app
        .send(signed_webhook(&checkout_completed(json!({"promoCode": "SPRING"}))))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"received": true}));

    let header = app.store.header(&data_target());
    assert_eq!(&header[..2], &["timestamp", "email"]);
    assert_eq!(header.last().map(String::as_str), Some("promoCode"));

    let rows = app.store.rows(&data_target());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], CellValue::Text("jo@x.com".to_string()));
    assert_eq!(rows[0].len(), header.len());
}

#[tokio::test]
async fn photo_urls_become_one_multiline_cell() {
    let app = TestApp::new();

    app.send(signed_webhook(&checkout_completed(json!({"photoUrls": "a,b,c"}))))
        .await;

    let header = app.store.header(&data_target());
    let index = header.iter().position(|h| h == "photoUrls").unwrap();
    assert_eq!(
        app.store.rows(&data_target())[0][index],
        CellValue::Text("a\nb\nc".to_string())
    );
}

#[tokio::test]
async fn other_event_types_are_acknowledged_without_append() {
    let app = TestApp::new();
    let payload = json!({
        "id": "evt_other",
        "type": "payment_intent.created",
        "data": {"object": {"id": "pi_1"}}
    })
    .to_string()
    .into_bytes();

    let response = app.send(signed_webhook(&payload)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.store.call_count(SheetOperation::AppendRow), 0);
}

#[tokio::test]
async fn append_failure_is_still_acknowledged() {
    let app = TestApp::new();
    app.store.fail_always(
        SheetOperation::AppendRow,
        SheetError::from_status(503, "backend unavailable"),
    );

    let response = app.send(signed_webhook(&checkout_completed(json!({})))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"received": true}));
    assert!(app.store.rows(&data_target()).is_empty());
}

#[tokio::test]
async fn missing_credentials_are_still_acknowledged() {
    let app = TestApp::new();
    app.store.fail_always(
        SheetOperation::ReadHeader,
        SheetError::credentials_missing("no service account configured"),
    );

    let response = app.send(signed_webhook(&checkout_completed(json!({})))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.store.call_count(SheetOperation::AppendRow), 0);
}

#[tokio::test]
async fn replayed_fields_do_not_duplicate_columns() {
    let app = TestApp::new();
    let payload = checkout_completed(json!({"promoCode": "SPRING"}));

    app.send(signed_webhook(&payload)).await;
    app.send(signed_webhook(&payload)).await;

    let header = app.store.header(&data_target());
    assert_eq!(header.iter().filter(|h| *h == "promoCode").count(), 1);
    assert_eq!(app.store.rows(&data_target()).len(), 2);
    assert_eq!(app.store.call_count(SheetOperation::WriteHeader), 1);
}
