//! Checkout handlers.
//!
//! ## Commands
//! - Creating hosted checkout sessions

mod create_checkout_session;

pub use create_checkout_session::{
    CheckoutError, CheckoutSettings, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
    CreateCheckoutSessionResult,
};
