//! Integration tests for `POST /api/create-checkout-session`.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use checkout_sheets::ports::PaymentError;

use common::{body_json, body_text, empty_request, json_request, TestApp};

const URI: &str = "/api/create-checkout-session";

fn valid_body() -> serde_json::Value {
    json!({
        "productName": "Portrait session",
        "productPrice": 2500,
        "customerName": "Jo",
        "customerEmail": "jo@x.com",
        "metadata": {"promoCode": "SPRING", "photoUrls": "a,b"}
    })
}

#[tokio::test]
async fn returns_checkout_url() {
    let app = TestApp::new();

    let response = app.send(json_request("POST", URI, valid_body())).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["checkoutUrl"].as_str().unwrap().starts_with("https://"));

    let request = app.payments.last_request().unwrap();
    assert_eq!(request.product_name, "Portrait session");
    assert_eq!(request.unit_amount, 2500);
    assert_eq!(request.customer_email, "jo@x.com");
    assert_eq!(request.metadata.get("customerName").map(String::as_str), Some("Jo"));
    assert_eq!(request.metadata.get("photoUrls").map(String::as_str), Some("a,b"));
}

#[tokio::test]
async fn missing_fields_are_listed() {
    let app = TestApp::new();

    let response = app
        .send(json_request("POST", URI, json!({"productName": "Portrait"})))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Missing required fields: productPrice, customerEmail"})
    );
    assert!(!app.payments.was_called());
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = TestApp::new();
    let request = axum::http::Request::builder()
        .method("POST")
        .uri(URI)
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn provider_failure_is_500() {
    let app = TestApp::new();
    app.payments
        .set_error(PaymentError::authentication("Invalid API Key provided"));

    let response = app.send(json_request("POST", URI, valid_body())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Invalid API Key provided"})
    );
}

#[tokio::test]
async fn options_is_ok_with_empty_body() {
    let app = TestApp::new();

    let response = app.send(empty_request("OPTIONS", URI)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.is_empty());
}

#[tokio::test]
async fn get_is_method_not_allowed() {
    let app = TestApp::new();

    let response = app.send(empty_request("GET", URI)).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(response).await, json!({"error": "Method not allowed"}));
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let app = TestApp::new();
    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri(URI)
        .header("origin", "https://form.example.com")
        .header("access-control-request-method", "POST")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}
