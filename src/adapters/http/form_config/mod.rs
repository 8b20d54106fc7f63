//! HTTP adapter for the form configuration.
//!
//! - `GET /api/get-form-config` - Form steps read from the spreadsheet

pub mod dto;
mod handlers;
mod routes;

pub use dto::FormConfigResponse;
pub use handlers::FORM_CONFIG_CACHE_CONTROL;
pub use routes::form_config_routes;
