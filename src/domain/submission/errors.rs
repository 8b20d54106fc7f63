//! Error types for webhook ingestion.
//!
//! Two families live here: `WebhookError` rejects the delivery (the
//! provider sees a 4xx), while
//! `StorageFailure` describes a downstream spreadsheet problem that is logged
//! and absorbed after the event has been verified.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that reject an inbound webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// The `Stripe-Signature` header was not sent.
    #[error("Missing Stripe-Signature header")]
    MissingSignature,

    /// Signature header could not be parsed.
    #[error("Malformed signature header: {0}")]
    MalformedSignature(String),

    /// No signature in the header matches the payload.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signed timestamp is older than the tolerance window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Signed timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Payload verified but is not a well-formed event.
    #[error("Malformed event: {0}")]
    MalformedEvent(String),
}

impl WebhookError {
    /// True for every failure of the authenticity check, as opposed to a
    /// verified payload that turned out to be malformed.
    pub fn is_signature_failure(&self) -> bool {
        !matches!(self, WebhookError::MalformedEvent(_))
    }

    /// Maps the error to the HTTP status returned to the provider.
    ///
    /// Every rejection is a client error; the provider will not retry it.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

/// Downstream storage failures, by pipeline stage.
///
/// None of these reach the provider: once an event is verified, the
/// delivery is acknowledged regardless.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageFailure {
    /// Spreadsheet credentials or destination id are not configured.
    #[error("Credentials missing: {0}")]
    CredentialsMissing(String),

    /// Reading the header row failed.
    #[error("Schema read failed: {0}")]
    SchemaReadFailed(String),

    /// Writing the reconciled header row failed.
    #[error("Schema write failed: {0}")]
    SchemaWriteFailed(String),

    /// Appending the data row failed (after the bounded retry).
    #[error("Append failed: {0}")]
    AppendFailed(String),

    /// Column auto-sizing failed. Never fails the append.
    #[error("Cosmetic formatting failed: {0}")]
    CosmeticFormattingFailed(String),
}

impl StorageFailure {
    /// Short stable label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            StorageFailure::CredentialsMissing(_) => "credentials_missing",
            StorageFailure::SchemaReadFailed(_) => "schema_read_failed",
            StorageFailure::SchemaWriteFailed(_) => "schema_write_failed",
            StorageFailure::AppendFailed(_) => "append_failed",
            StorageFailure::CosmeticFormattingFailed(_) => "cosmetic_formatting_failed",
        }
    }
}
