//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod checkout;
pub mod form_config;
pub mod submission;

pub use checkout::{
    CheckoutError, CheckoutSettings, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
    CreateCheckoutSessionResult,
};
pub use form_config::{
    FormConfigError, FormConfigSource, GetFormConfigHandler, GetFormConfigQuery,
    GetFormConfigResult, DEFAULT_FORM_CONFIG_RANGE,
};
pub use submission::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
    WebhookOutcome, WebhookStorageSettings, DEFAULT_APPEND_RETRY_DELAY,
};
