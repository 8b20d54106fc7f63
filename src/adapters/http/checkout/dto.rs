//! HTTP DTOs for the checkout endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::handlers::CreateCheckoutSessionCommand;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to start a hosted checkout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutSessionRequest {
    #[serde(default)]
    pub product_name: Option<String>,
    /// Price in the currency's minor unit.
    #[serde(default)]
    pub product_price: Option<i64>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Remaining form answers. Non-string values are sent as their JSON text.
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl From<CreateCheckoutSessionRequest> for CreateCheckoutSessionCommand {
    fn from(request: CreateCheckoutSessionRequest) -> Self {
        let metadata = request
            .metadata
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((key, s)),
                other => Some((key, other.to_string())),
            })
            .collect();

        CreateCheckoutSessionCommand {
            product_name: request.product_name,
            product_price: request.product_price,
            customer_name: request.customer_name,
            customer_email: request.customer_email,
            metadata,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response carrying the hosted checkout URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub checkout_url: String,
}
