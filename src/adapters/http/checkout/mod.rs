//! HTTP adapter for hosted checkout.
//!
//! - `POST /api/create-checkout-session` - Create a Stripe Checkout session

pub mod dto;
mod handlers;
mod routes;

pub use dto::{CheckoutResponse, CreateCheckoutSessionRequest};
pub use routes::checkout_routes;
