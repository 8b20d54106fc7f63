//! HTTP handlers for the webhook endpoint.

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;

use super::dto::WebhookAckResponse;
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{HandlePaymentWebhookCommand, WebhookOutcome};

/// Header carrying the provider's signature.
pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

/// POST /api/webhook - Receive a Stripe event
///
/// The body is taken as raw bytes; the signature covers them exactly.
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    let result = state.webhook_handler.handle(cmd).await?;

    if let WebhookOutcome::StoreFailed(failure) = &result.outcome {
        tracing::debug!(
            event_id = %result.event_id,
            failure = failure.kind(),
            "Acknowledging event despite storage failure"
        );
    }

    Ok(Json(WebhookAckResponse::received()))
}
