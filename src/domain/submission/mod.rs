//! Submission domain - webhook ingestion and row mapping.
//!
//! The pipeline for a paid checkout:
//! 1. [`StripeWebhookVerifier`] authenticates the raw delivery
//! 2. [`EventNormalizer`] turns the checkout session into a [`NormalizedRecord`]
//! 3. [`SheetSchema::reconcile`] grows the header row to fit the record
//! 4. [`map_row`] projects the record onto the header order
//!
//! Storage itself is behind the `SheetStore` port.

mod errors;
mod normalizer;
mod record;
mod row;
mod schema;
mod state;
mod stripe_event;
mod webhook_verifier;

pub use errors::{StorageFailure, WebhookError};
pub use normalizer::{
    split_photo_urls, EventNormalizer, Normalization, NormalizerOptions, PaymentSession,
    PAYMENT_STATUS_COMPLETED, UNKNOWN_CUSTOMER_NAME,
};
pub use record::{
    field_key, is_system_field, minor_to_major, FieldValue, NormalizedRecord, FIELD_EMAIL,
    FIELD_NAME, FIELD_PAYMENT_AMOUNT, FIELD_PAYMENT_ID, FIELD_PAYMENT_STATUS, FIELD_PHOTO_URLS,
    FIELD_TIMESTAMP, METADATA_CUSTOMER_NAME, SYSTEM_FIELDS,
};
pub use row::{map_row, CellValue, SheetRow};
pub use schema::{Reconciliation, SheetSchema};
pub use state::{WebhookLifecycle, WebhookState};
pub use stripe_event::{
    StripeCheckoutSession, StripeCustomerDetails, StripeEvent, StripeEventData, StripeEventType,
};
pub use webhook_verifier::{
    sign_payload, SignatureHeader, StripeWebhookVerifier, DEFAULT_TOLERANCE_SECS,
};
