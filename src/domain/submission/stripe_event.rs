//! Stripe webhook event types.
//!
//! Only the fields the submission pipeline reads are captured. Everything
//! else in Stripe's envelope is ignored by serde.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Stripe webhook event envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    #[serde(default)]
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,

    /// API version used to render this event.
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,
}

impl StripeEvent {
    /// Classifies the event type string.
    pub fn kind(&self) -> StripeEventType {
        StripeEventType::parse(&self.event_type)
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data.object)
    }
}

/// Event kinds the pipeline distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeEventType {
    /// Checkout session completed successfully.
    CheckoutSessionCompleted,
    /// Any other event; acknowledged without processing.
    Other,
}

impl StripeEventType {
    /// Parse event type from string.
    pub fn parse(s: &str) -> Self {
        match s {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            _ => Self::Other,
        }
    }
}

/// Checkout Session object as delivered in `checkout.session.completed`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StripeCheckoutSession {
    /// Unique session identifier (cs_...).
    pub id: String,

    /// PaymentIntent created for the session, absent for free sessions.
    #[serde(default)]
    pub payment_intent: Option<String>,

    /// Total amount in the currency's minor unit.
    #[serde(default)]
    pub amount_total: Option<i64>,

    /// Three-letter ISO currency code, lowercase.
    #[serde(default)]
    pub currency: Option<String>,

    /// Email passed when the session was created.
    #[serde(default)]
    pub customer_email: Option<String>,

    /// Details the customer entered during checkout.
    #[serde(default)]
    pub customer_details: Option<StripeCustomerDetails>,

    /// Metadata attached when the session was created.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Customer details collected by the hosted checkout page.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StripeCustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_checkout_completed_envelope() {
        let payload = r#"{
            "id": "evt_1",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "livemode": false,
            "data": {"object": {
                "id": "cs_1",
                "payment_intent": "pi_1",
                "amount_total": 1250,
                "currency": "usd",
                "customer_details": {"email": "jo@x.com", "name": "Jo"},
                "metadata": {"customerName": "Jo", "promoCode": "X"}
            }}
        }"#;

        let event: StripeEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(event.kind(), StripeEventType::CheckoutSessionCompleted);

        let session: StripeCheckoutSession = event.deserialize_object().unwrap();
        assert_eq!(session.id, "cs_1");
        assert_eq!(session.payment_intent.as_deref(), Some("pi_1"));
        assert_eq!(session.amount_total, Some(1250));
        assert_eq!(
            session.customer_details.and_then(|d| d.name).as_deref(),
            Some("Jo")
        );
        assert_eq!(session.metadata.get("promoCode").map(String::as_str), Some("X"));
    }

    #[test]
    fn tolerates_null_and_missing_optional_fields() {
        let object = serde_json::json!({
            "id": "cs_2",
            "payment_intent": null,
            "customer_details": null
        });
        let session: StripeCheckoutSession = serde_json::from_value(object).unwrap();
        assert!(session.payment_intent.is_none());
        assert!(session.amount_total.is_none());
        assert!(session.metadata.is_empty());
    }

    #[test]
    fn unknown_types_are_other() {
        assert_eq!(StripeEventType::parse("invoice.paid"), StripeEventType::Other);
        assert_eq!(StripeEventType::parse(""), StripeEventType::Other);
    }
}
