//! Service index and liveness endpoints.

use axum::extract::Json;
use serde::Serialize;

/// Status document served at `GET /api`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIndexResponse {
    pub status: &'static str,
    pub available_endpoints: Vec<&'static str>,
    pub message: &'static str,
}

/// GET /api - Status and endpoint listing
pub async fn api_index() -> Json<ApiIndexResponse> {
    Json(ApiIndexResponse {
        status: "API is running",
        available_endpoints: vec![
            "/api/create-checkout-session",
            "/api/webhook",
            "/api/get-form-config",
        ],
        message: "API for Stripe form integration is working properly",
    })
}

/// GET /health - Liveness probe
pub async fn health() -> &'static str {
    "ok"
}
