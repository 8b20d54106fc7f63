//! HTTP handlers for the form configuration endpoint.

use axum::extract::{Json, State};
use axum::http::header::CACHE_CONTROL;
use axum::response::IntoResponse;

use super::dto::FormConfigResponse;
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::handlers::GetFormConfigQuery;

/// Shared-cache lifetime for the form configuration.
pub const FORM_CONFIG_CACHE_CONTROL: &str = "s-maxage=300, stale-while-revalidate=600";

/// GET /api/get-form-config - Ordered form steps
pub async fn get_form_config(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.form_config_handler.handle(GetFormConfigQuery).await?;

    Ok((
        [(CACHE_CONTROL, FORM_CONFIG_CACHE_CONTROL)],
        Json(FormConfigResponse::from(result)),
    ))
}
