//! Axum router configuration for the checkout endpoint.

use axum::routing::post;
use axum::Router;

use super::handlers::{checkout_preflight, create_checkout_session};
use crate::adapters::http::error::method_not_allowed;
use crate::adapters::http::state::AppState;

/// Create the checkout router.
///
/// # Routes
/// - `POST /create-checkout-session` - Start a hosted checkout
/// - `OPTIONS /create-checkout-session` - 200 with no body
pub fn checkout_routes() -> Router<AppState> {
    Router::new().route(
        "/create-checkout-session",
        post(create_checkout_session)
            .options(checkout_preflight)
            .fallback(method_not_allowed),
    )
}
