//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `stripe` - Hosted checkout through the Stripe API
//! - `google_sheets` - Spreadsheet storage through the Sheets API
//! - `http` - axum routes exposing the application handlers

pub mod google_sheets;
pub mod http;
pub mod stripe;

pub use google_sheets::{GoogleSheetsConfig, GoogleSheetsStore, InMemorySheetStore};
pub use http::{app_router, AppState};
pub use stripe::{MockPaymentProvider, StripeConfig, StripePaymentAdapter};
