//! Checkout Sheets - Stripe Checkout to Google Sheets bridge
//!
//! Creates hosted checkout sessions for a multi-step form, verifies the
//! signed `checkout.session.completed` webhooks that follow, and appends
//! each completed payment as a row in a spreadsheet whose header grows to
//! fit whatever form fields arrive.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
