//! HTTP adapter for Stripe webhooks.
//!
//! - `POST /api/webhook` - Verify and store `checkout.session.completed` events

pub mod dto;
mod handlers;
mod routes;

pub use dto::WebhookAckResponse;
pub use handlers::STRIPE_SIGNATURE_HEADER;
pub use routes::webhook_routes;
