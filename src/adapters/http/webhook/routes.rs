//! Axum router configuration for the webhook endpoint.

use axum::routing::post;
use axum::Router;

use super::handlers::handle_stripe_webhook;
use crate::adapters::http::error::method_not_allowed;
use crate::adapters::http::state::AppState;

/// Create the Stripe webhook router.
///
/// No authentication; requests are verified via signature.
///
/// # Routes
/// - `POST /webhook` - Handle Stripe webhooks
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route(
        "/webhook",
        post(handle_stripe_webhook).fallback(method_not_allowed),
    )
}
