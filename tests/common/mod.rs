//! Shared harness for the HTTP integration tests.
//!
//! Wires the real router to the in-memory sheet store and the mock payment
//! provider.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use tower::ServiceExt;

use checkout_sheets::adapters::google_sheets::InMemorySheetStore;
use checkout_sheets::adapters::http::{app_router, AppState};
use checkout_sheets::adapters::stripe::MockPaymentProvider;
use checkout_sheets::application::handlers::{
    CheckoutSettings, CreateCheckoutSessionHandler, FormConfigSource, GetFormConfigHandler,
    HandlePaymentWebhookHandler, WebhookStorageSettings, DEFAULT_FORM_CONFIG_RANGE,
};
use checkout_sheets::domain::foundation::Timestamp;
use checkout_sheets::domain::submission::{sign_payload, StripeWebhookVerifier};
use checkout_sheets::ports::SheetTarget;

pub const WEBHOOK_SECRET: &str = "whsec_integration_secret";
pub const DATA_SPREADSHEET: &str = "ss_data";
pub const FORM_SPREADSHEET: &str = "ss_form";

pub struct TestApp {
    pub router: Router,
    pub store: InMemorySheetStore,
    pub payments: MockPaymentProvider,
}

impl TestApp {
    pub fn new() -> Self {
        let store = InMemorySheetStore::new();
        let payments = MockPaymentProvider::new();

        let checkout = CreateCheckoutSessionHandler::new(
            Arc::new(payments.clone()),
            CheckoutSettings {
                currency: "usd".to_string(),
                success_url: "https://shop.example.com/success".to_string(),
                cancel_url: "https://shop.example.com/cancel".to_string(),
            },
        );

        let mut storage = WebhookStorageSettings::new(data_target());
        storage.append_retry_delay = Duration::from_millis(1);
        let webhook = HandlePaymentWebhookHandler::new(
            StripeWebhookVerifier::new(WEBHOOK_SECRET),
            Arc::new(store.clone()),
            storage,
        );

        let form_config = GetFormConfigHandler::new(
            Arc::new(store.clone()),
            FormConfigSource {
                spreadsheet_id: FORM_SPREADSHEET.to_string(),
                range: DEFAULT_FORM_CONFIG_RANGE.to_string(),
            },
        );

        let state = AppState::new(checkout, webhook, form_config);
        Self {
            router: app_router(state, Duration::from_secs(5)),
            store,
            payments,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn data_target() -> SheetTarget {
    SheetTarget::new(DATA_SPREADSHEET, "Sheet1")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// A webhook request signed with `WEBHOOK_SECRET` at the current time.
pub fn signed_webhook(payload: &[u8]) -> Request<Body> {
    let signature = sign_payload(WEBHOOK_SECRET, Timestamp::now().as_unix_secs(), payload);
    Request::builder()
        .method("POST")
        .uri("/api/webhook")
        .header("content-type", "application/json")
        .header("stripe-signature", signature)
        .body(Body::from(payload.to_vec()))
        .unwrap()
}

pub fn checkout_completed(metadata: serde_json::Value) -> Vec<u8> {
    serde_json::json!({
        "id": "evt_int_1",
        "type": "checkout.session.completed",
        "created": 1704067200,
        "livemode": false,
        "data": {"object": {
            "id": "cs_int_1",
            "payment_intent": "pi_int_1",
            "amount_total": 1250,
            "currency": "usd",
            "customer_details": {"email": "jo@x.com", "name": "Jo"},
            "metadata": metadata
        }}
    })
    .to_string()
    .into_bytes()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
