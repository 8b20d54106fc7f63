//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentProvider` - Hosted checkout session creation
//! - `SheetStore` - Spreadsheet header, append and range access

mod payment_provider;
mod sheet_store;

pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
};
pub use sheet_store::{SheetError, SheetErrorCode, SheetStore, SheetTarget};
