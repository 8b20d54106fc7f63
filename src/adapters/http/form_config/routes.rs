//! Axum router configuration for the form configuration endpoint.

use axum::routing::get;
use axum::Router;

use super::handlers::get_form_config;
use crate::adapters::http::error::method_not_allowed;
use crate::adapters::http::state::AppState;

/// # Routes
/// - `GET /get-form-config` - Ordered form steps
pub fn form_config_routes() -> Router<AppState> {
    Router::new().route(
        "/get-form-config",
        get(get_form_config).fallback(method_not_allowed),
    )
}
