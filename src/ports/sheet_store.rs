//! Sheet store port for tabular persistence.
//!
//! A spreadsheet tab is used as a lightweight append-only table: row 1 holds
//! the headers, each subsequent row holds one submission.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::submission::SheetRow;

/// Port for spreadsheet access.
///
/// Implementations hold their own credentials. When none are configured,
/// every call fails with [`SheetErrorCode::CredentialsMissing`].
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Read the header row (row 1). An empty sheet yields an empty list.
    async fn read_header(&self, target: &SheetTarget) -> Result<Vec<String>, SheetError>;

    /// Overwrite the header row with `headers`.
    ///
    /// Writing the same list twice leaves the sheet unchanged.
    async fn write_header(&self, target: &SheetTarget, headers: &[String])
        -> Result<(), SheetError>;

    /// Append `row` after the last row with data.
    async fn append_row(&self, target: &SheetTarget, row: &SheetRow) -> Result<(), SheetError>;

    /// Resize the first `column_count` columns to fit their content.
    async fn autosize_columns(
        &self,
        target: &SheetTarget,
        column_count: usize,
    ) -> Result<(), SheetError>;

    /// Read an A1 range as rows of display strings.
    async fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, SheetError>;
}

/// A tab within a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetTarget {
    pub spreadsheet_id: String,
    pub sheet_name: String,
}

impl SheetTarget {
    pub fn new(spreadsheet_id: impl Into<String>, sheet_name: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
        }
    }
}

/// Errors from sheet store operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetError {
    /// Error code for categorization.
    pub code: SheetErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl SheetError {
    /// Create a new sheet error.
    pub fn new(code: SheetErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    pub fn credentials_missing(message: impl Into<String>) -> Self {
        Self::new(SheetErrorCode::CredentialsMissing, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(SheetErrorCode::AuthenticationError, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SheetErrorCode::NetworkError, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(SheetErrorCode::Timeout, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(SheetErrorCode::InvalidResponse, message)
    }

    /// Classify a non-success HTTP status from the Sheets API.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let code = match status {
            401 | 403 => SheetErrorCode::AuthenticationError,
            404 => SheetErrorCode::NotFound,
            408 => SheetErrorCode::Timeout,
            429 => SheetErrorCode::RateLimited,
            500..=599 => SheetErrorCode::ServerError,
            _ => SheetErrorCode::RequestRejected,
        };
        Self::new(code, message)
    }

    pub fn is_credentials_missing(&self) -> bool {
        self.code == SheetErrorCode::CredentialsMissing
    }
}

impl std::fmt::Display for SheetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for SheetError {}

/// Sheet error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetErrorCode {
    /// No service-account credentials or spreadsheet id configured.
    CredentialsMissing,

    /// Token exchange failed or access was denied.
    AuthenticationError,

    /// Network connectivity issue.
    NetworkError,

    /// Request exceeded its deadline.
    Timeout,

    /// Quota exceeded.
    RateLimited,

    /// Spreadsheet or tab does not exist.
    NotFound,

    /// 5xx from the API.
    ServerError,

    /// Any other 4xx.
    RequestRejected,

    /// Response body did not have the expected shape.
    InvalidResponse,
}

impl SheetErrorCode {
    /// Check if this error type is transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SheetErrorCode::NetworkError
                | SheetErrorCode::Timeout
                | SheetErrorCode::RateLimited
                | SheetErrorCode::ServerError
        )
    }
}

impl std::fmt::Display for SheetErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SheetErrorCode::CredentialsMissing => "credentials_missing",
            SheetErrorCode::AuthenticationError => "authentication_error",
            SheetErrorCode::NetworkError => "network_error",
            SheetErrorCode::Timeout => "timeout",
            SheetErrorCode::RateLimited => "rate_limited",
            SheetErrorCode::NotFound => "not_found",
            SheetErrorCode::ServerError => "server_error",
            SheetErrorCode::RequestRejected => "request_rejected",
            SheetErrorCode::InvalidResponse => "invalid_response",
        };
        write!(f, "{}", s)
    }
}
