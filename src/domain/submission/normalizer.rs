//! Event normalization.
//!
//! Turns a completed checkout session into a [`NormalizedRecord`]: system
//! fields are resolved from the session, metadata passes through as dynamic
//! fields, and a couple of form conventions (`photoUrls`, `customerName`)
//! are applied.

use std::collections::BTreeMap;

use crate::domain::foundation::Timestamp;

use super::errors::WebhookError;
use super::record::{
    is_system_field, minor_to_major, FieldValue, NormalizedRecord, FIELD_EMAIL, FIELD_NAME,
    FIELD_PAYMENT_AMOUNT, FIELD_PAYMENT_ID, FIELD_PAYMENT_STATUS, FIELD_PHOTO_URLS,
    FIELD_TIMESTAMP, METADATA_CUSTOMER_NAME,
};
use super::stripe_event::{StripeCheckoutSession, StripeEvent, StripeEventType};

/// Display name used when neither Stripe nor the form supplied one.
pub const UNKNOWN_CUSTOMER_NAME: &str = "Unknown";

/// Status written for every completed checkout.
pub const PAYMENT_STATUS_COMPLETED: &str = "completed";

/// A completed payment, independent of Stripe's wire shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentSession {
    pub session_id: String,
    pub payment_id: Option<String>,
    /// Amount in minor currency units.
    pub amount_minor: Option<i64>,
    pub currency: Option<String>,
    /// Email the customer entered on the hosted page.
    pub customer_details_email: Option<String>,
    /// Email the session was created with.
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl From<StripeCheckoutSession> for PaymentSession {
    fn from(session: StripeCheckoutSession) -> Self {
        let (details_email, details_name) = session
            .customer_details
            .map(|d| (d.email, d.name))
            .unwrap_or_default();

        PaymentSession {
            session_id: session.id,
            payment_id: session.payment_intent,
            amount_minor: session.amount_total,
            currency: session.currency,
            customer_details_email: details_email,
            customer_email: session.customer_email,
            customer_name: details_name,
            metadata: session.metadata,
        }
    }
}

/// Knobs for normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerOptions {
    /// Drop the `customerName` metadata key when it repeats the resolved name.
    pub drop_duplicate_customer_name: bool,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            drop_duplicate_customer_name: true,
        }
    }
}

/// Result of normalizing one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalization {
    pub record: NormalizedRecord,
    /// Metadata keys dropped because they collide with a system field.
    pub discarded_keys: Vec<String>,
}

/// Builds normalized records from payment sessions.
#[derive(Debug, Clone, Default)]
pub struct EventNormalizer {
    options: NormalizerOptions,
}

impl EventNormalizer {
    pub fn new(options: NormalizerOptions) -> Self {
        Self { options }
    }

    /// Extracts the checkout session from a verified event.
    ///
    /// Returns `Ok(None)` for event kinds that are acknowledged without
    /// processing.
    pub fn session_from_event(
        &self,
        event: &StripeEvent,
    ) -> Result<Option<PaymentSession>, WebhookError> {
        match event.kind() {
            StripeEventType::CheckoutSessionCompleted => {
                let session: StripeCheckoutSession = event
                    .deserialize_object()
                    .map_err(|e| WebhookError::MalformedEvent(e.to_string()))?;
                Ok(Some(session.into()))
            }
            StripeEventType::Other => Ok(None),
        }
    }

    /// Normalizes a session as of `now`.
    pub fn normalize(&self, session: &PaymentSession, now: Timestamp) -> Normalization {
        let name = resolve_name(session);
        let email = first_non_empty([
            session.customer_details_email.as_deref(),
            session.customer_email.as_deref(),
        ])
        .unwrap_or_default();

        let mut record = NormalizedRecord::new();
        let mut discarded_keys = Vec::new();

        for (key, value) in &session.metadata {
            if is_system_field(key) {
                discarded_keys.push(key.clone());
                continue;
            }
            if key == METADATA_CUSTOMER_NAME
                && self.options.drop_duplicate_customer_name
                && value == &name
            {
                continue;
            }
            if key == FIELD_PHOTO_URLS {
                record.insert(key.clone(), split_photo_urls(value));
            } else {
                record.insert(key.clone(), value.clone());
            }
        }

        record.insert(FIELD_TIMESTAMP, now.to_iso_millis());
        record.insert(FIELD_NAME, name);
        record.insert(FIELD_EMAIL, email.to_string());
        record.insert(FIELD_PAYMENT_STATUS, PAYMENT_STATUS_COMPLETED);
        record.insert(
            FIELD_PAYMENT_ID,
            session.payment_id.clone().unwrap_or_default(),
        );
        record.insert(
            FIELD_PAYMENT_AMOUNT,
            session
                .amount_minor
                .map(|amount| FieldValue::Number(minor_to_major(amount)))
                .unwrap_or_else(FieldValue::empty),
        );

        Normalization {
            record,
            discarded_keys,
        }
    }
}

fn resolve_name(session: &PaymentSession) -> String {
    first_non_empty([
        session.customer_name.as_deref(),
        session.metadata.get(METADATA_CUSTOMER_NAME).map(String::as_str),
    ])
    .unwrap_or(UNKNOWN_CUSTOMER_NAME)
    .to_string()
}

fn first_non_empty<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

/// Splits a comma-joined URL list, trimming parts and dropping empties.
pub fn split_photo_urls(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
