//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands (checkout, webhook) change external state; the form configuration
//! query only reads it.

pub mod handlers;

pub use handlers::{
    // Checkout
    CheckoutError, CheckoutSettings, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
    CreateCheckoutSessionResult,
    // Form configuration
    FormConfigError, FormConfigSource, GetFormConfigHandler, GetFormConfigQuery,
    GetFormConfigResult,
    // Webhooks
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
    WebhookOutcome, WebhookStorageSettings,
};
