//! Spreadsheet configuration (Google Sheets)

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Spreadsheet configuration
#[derive(Debug, Deserialize)]
pub struct SheetsConfig {
    /// Service-account key JSON. Absent credentials are reported per request.
    pub credentials_json: Option<SecretString>,

    /// Spreadsheet receiving one row per completed checkout
    pub spreadsheet_id: String,

    /// Spreadsheet holding the form step table; defaults to `spreadsheet_id`
    pub form_config_spreadsheet_id: Option<String>,

    /// Tab receiving submissions
    #[serde(default = "default_data_sheet_name")]
    pub data_sheet_name: String,

    /// A1 range of the form step table
    #[serde(default = "default_form_config_range")]
    pub form_config_range: String,

    /// Timeout for Sheets API calls, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Pause before the single append retry, in milliseconds
    #[serde(default = "default_append_retry_delay")]
    pub append_retry_delay_ms: u64,

    /// Drop a metadata `customerName` equal to the record's `name`
    #[serde(default = "default_drop_duplicate_customer_name")]
    pub drop_duplicate_customer_name: bool,
}

impl SheetsConfig {
    /// Spreadsheet holding the form configuration.
    pub fn form_config_spreadsheet_id(&self) -> &str {
        self.form_config_spreadsheet_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.spreadsheet_id)
    }

    /// Validate spreadsheet configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("SHEETS__SPREADSHEET_ID"));
        }
        if self.data_sheet_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("SHEETS__DATA_SHEET_NAME"));
        }
        if self.form_config_range.trim().is_empty() {
            return Err(ValidationError::MissingRequired("SHEETS__FORM_CONFIG_RANGE"));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_data_sheet_name() -> String {
    "Sheet1".to_string()
}

fn default_form_config_range() -> String {
    "Form_Config!A2:K".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_append_retry_delay() -> u64 {
    500
}

fn default_drop_duplicate_customer_name() -> bool {
    true
}
