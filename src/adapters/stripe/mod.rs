//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for hosted one-off checkout.
//! Webhook signature verification lives in the submission domain, since it
//! needs nothing but the signing secret and the raw bytes.
//!
//! # Security
//!
//! - The secret API key is handled via `secrecy::SecretString`
//! - Requests carry an explicit timeout

mod mock_payment_provider;
mod stripe_adapter;

pub use mock_payment_provider::MockPaymentProvider;
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
