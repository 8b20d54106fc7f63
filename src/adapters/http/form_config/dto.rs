//! HTTP DTOs for the form configuration endpoint.

use serde::Serialize;

use crate::application::handlers::GetFormConfigResult;
use crate::domain::form_config::FormStep;

/// Ordered form steps with the time they were read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfigResponse {
    pub form_steps: Vec<FormStep>,
    /// ISO 8601, millisecond precision.
    pub last_updated: String,
}

impl From<GetFormConfigResult> for FormConfigResponse {
    fn from(result: GetFormConfigResult) -> Self {
        Self {
            form_steps: result.form_steps,
            last_updated: result.last_updated.to_iso_millis(),
        }
    }
}
