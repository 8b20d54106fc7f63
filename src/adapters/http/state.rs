//! Shared application state.

use std::sync::Arc;

use crate::application::handlers::{
    CreateCheckoutSessionHandler, GetFormConfigHandler, HandlePaymentWebhookHandler,
};

/// Shared application state containing all dependencies.
///
/// Cloned for each request; the handlers are built once at startup and
/// shared behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub checkout_handler: Arc<CreateCheckoutSessionHandler>,
    pub webhook_handler: Arc<HandlePaymentWebhookHandler>,
    pub form_config_handler: Arc<GetFormConfigHandler>,
}

impl AppState {
    pub fn new(
        checkout_handler: CreateCheckoutSessionHandler,
        webhook_handler: HandlePaymentWebhookHandler,
        form_config_handler: GetFormConfigHandler,
    ) -> Self {
        Self {
            checkout_handler: Arc::new(checkout_handler),
            webhook_handler: Arc::new(webhook_handler),
            form_config_handler: Arc::new(form_config_handler),
        }
    }
}
