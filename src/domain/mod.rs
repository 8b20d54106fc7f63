//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (timestamps, validation errors, state machines)
//! - `submission` - Webhook verification, normalization, schema reconciliation and row mapping
//! - `form_config` - Checkout form step descriptors

pub mod form_config;
pub mod foundation;
pub mod submission;
