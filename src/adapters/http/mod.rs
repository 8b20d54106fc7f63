//! HTTP adapters - REST API implementations.
//!
//! Each endpoint group has its own module with DTOs, handlers, and routes.
//! [`app_router`] assembles them under `/api` with the shared middleware.

pub mod checkout;
pub mod error;
pub mod form_config;
mod index;
mod router;
pub mod state;
pub mod webhook;

pub use error::{ApiError, ErrorResponse};
pub use index::ApiIndexResponse;
pub use router::{api_routes, app_router, cors_layer};
pub use state::AppState;
