//! HTTP DTOs for the webhook endpoint.

use serde::Serialize;

/// Acknowledgement returned once an event has been verified.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAckResponse {
    pub received: bool,
}

impl WebhookAckResponse {
    pub fn received() -> Self {
        Self { received: true }
    }
}
