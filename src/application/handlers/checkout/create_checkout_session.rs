//! CreateCheckoutSessionHandler - Command handler for starting a hosted checkout.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::domain::submission::METADATA_CUSTOMER_NAME;
use crate::ports::{CreateCheckoutRequest, PaymentError, PaymentProvider};

/// Command to create a checkout session.
#[derive(Debug, Clone, Default)]
pub struct CreateCheckoutSessionCommand {
    pub product_name: Option<String>,
    /// Price in the currency's minor unit.
    pub product_price: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    /// Extra form fields forwarded as session metadata.
    pub metadata: BTreeMap<String, String>,
}

/// Result of creating a checkout session.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCheckoutSessionResult {
    pub session_id: String,
    pub checkout_url: String,
}

/// Where the hosted page sends the customer afterwards, and in what currency
/// prices are quoted.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Errors from checkout session creation.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Required fields absent or blank; a non-positive price counts as absent.
    #[error("Missing required fields: {}", .missing.join(", "))]
    MissingFields { missing: Vec<&'static str> },

    #[error("{0}")]
    Provider(#[from] PaymentError),
}

/// Handler for creating hosted checkout sessions.
pub struct CreateCheckoutSessionHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    settings: CheckoutSettings,
}

impl CreateCheckoutSessionHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>, settings: CheckoutSettings) -> Self {
        Self {
            payment_provider,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutSessionCommand,
    ) -> Result<CreateCheckoutSessionResult, CheckoutError> {
        let request = self.build_request(cmd)?;
        let product_name = request.product_name.clone();

        let session = self
            .payment_provider
            .create_checkout_session(request)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, product = %product_name, "Error creating checkout session");
                e
            })?;

        tracing::info!(session_id = %session.id, "Checkout session created");

        Ok(CreateCheckoutSessionResult {
            session_id: session.id,
            checkout_url: session.url,
        })
    }

    fn build_request(
        &self,
        cmd: CreateCheckoutSessionCommand,
    ) -> Result<CreateCheckoutRequest, CheckoutError> {
        let product_name = non_blank(cmd.product_name);
        let product_price = cmd.product_price.filter(|p| *p > 0);
        let customer_email = non_blank(cmd.customer_email);

        let (Some(product_name), Some(unit_amount), Some(customer_email)) =
            (product_name.clone(), product_price, customer_email.clone())
        else {
            let mut missing = Vec::new();
            if product_name.is_none() {
                missing.push("productName");
            }
            if product_price.is_none() {
                missing.push("productPrice");
            }
            if customer_email.is_none() {
                missing.push("customerEmail");
            }
            return Err(CheckoutError::MissingFields { missing });
        };

        // Caller metadata overrides customerName
        let mut metadata = BTreeMap::new();
        if let Some(name) = cmd.customer_name {
            metadata.insert(METADATA_CUSTOMER_NAME.to_string(), name);
        }
        metadata.extend(cmd.metadata);

        Ok(CreateCheckoutRequest {
            product_name,
            unit_amount,
            currency: self.settings.currency.clone(),
            customer_email,
            success_url: self.settings.success_url.clone(),
            cancel_url: self.settings.cancel_url.clone(),
            metadata,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
