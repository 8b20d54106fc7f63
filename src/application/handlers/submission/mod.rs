//! Submission handlers.
//!
//! ## Commands
//! - Processing Stripe webhooks into spreadsheet rows

mod handle_payment_webhook;

pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
    WebhookOutcome, WebhookStorageSettings, DEFAULT_APPEND_RETRY_DELAY,
};
