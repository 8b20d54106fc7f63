//! HTTP handlers for the checkout endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::dto::{CheckoutResponse, CreateCheckoutSessionRequest};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;

/// POST /api/create-checkout-session - Start a hosted checkout
pub async fn create_checkout_session(
    State(state): State<AppState>,
    request: Result<Json<CreateCheckoutSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = request.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected checkout request body");
        ApiError::BadRequest(rejection.body_text())
    })?;

    let result = state.checkout_handler.handle(request.into()).await?;

    Ok(Json(CheckoutResponse {
        checkout_url: result.checkout_url,
    }))
}

/// OPTIONS /api/create-checkout-session - Bare preflight acknowledgement
pub async fn checkout_preflight() -> StatusCode {
    StatusCode::OK
}
