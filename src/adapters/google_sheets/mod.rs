//! Google Sheets adapter.
//!
//! Implements the `SheetStore` port against the Sheets API v4, authenticated
//! as a service account. An in-memory store with error injection backs the
//! tests.

mod in_memory;
mod service_account;
mod sheets_client;

pub use in_memory::{InMemorySheetStore, SheetOperation};
pub use service_account::{ServiceAccountKey, ServiceAccountTokenSource, SPREADSHEETS_SCOPE};
pub use sheets_client::{a1_range, GoogleSheetsConfig, GoogleSheetsStore};
