//! Google Sheets REST adapter.
//!
//! Implements `SheetStore` against the Sheets API v4 using a service-account
//! token. When no service account is configured the store still constructs,
//! and every call fails with `CredentialsMissing`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Url};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::submission::{CellValue, SheetRow};
use crate::ports::{SheetError, SheetErrorCode, SheetStore, SheetTarget};

use super::service_account::{ServiceAccountKey, ServiceAccountTokenSource};

/// Default Sheets API base URL.
const DEFAULT_API_BASE_URL: &str = "https://sheets.googleapis.com";

/// Default per-request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Google Sheets client configuration.
#[derive(Debug, Clone)]
pub struct GoogleSheetsConfig {
    /// Service account key JSON. `None` leaves the store unauthenticated.
    pub service_account: Option<ServiceAccountKey>,

    /// Base URL for the Sheets API.
    pub api_base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl GoogleSheetsConfig {
    pub fn new(service_account: Option<ServiceAccountKey>) -> Self {
        Self {
            service_account,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Sheets API `ValueRange`. Empty ranges omit `values` entirely.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// The slice of spreadsheet metadata needed to find a tab's numeric id.
#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

/// `SheetStore` backed by the Google Sheets API.
pub struct GoogleSheetsStore {
    http_client: reqwest::Client,
    api_base_url: String,
    token_source: Option<ServiceAccountTokenSource>,
}

impl GoogleSheetsStore {
    /// Create a new store. Fails only if the HTTP client cannot be built.
    pub fn new(config: GoogleSheetsConfig) -> Result<Self, SheetError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SheetError::network(format!("Failed to build HTTP client: {}", e)))?;

        let token_source = config
            .service_account
            .map(|key| ServiceAccountTokenSource::new(key, http_client.clone()));

        Ok(Self {
            http_client,
            api_base_url: config.api_base_url,
            token_source,
        })
    }

    /// True when a service account is configured.
    pub fn has_credentials(&self) -> bool {
        self.token_source.is_some()
    }

    fn token_source(&self) -> Result<&ServiceAccountTokenSource, SheetError> {
        self.token_source.as_ref().ok_or_else(|| {
            SheetError::credentials_missing("Google service account credentials are not configured")
        })
    }

    /// Builds `{base}/v4/spreadsheets/{id}/{segments...}` with each segment
    /// percent-encoded.
    fn url(&self, spreadsheet_id: &str, segments: &[&str]) -> Result<Url, SheetError> {
        if spreadsheet_id.trim().is_empty() {
            return Err(SheetError::credentials_missing("Spreadsheet id is not configured"));
        }

        let mut url = Url::parse(&self.api_base_url).map_err(|e| {
            SheetError::new(SheetErrorCode::RequestRejected, format!("Invalid Sheets base URL: {}", e))
        })?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                SheetError::new(
                    SheetErrorCode::RequestRejected,
                    "Sheets base URL cannot carry a path",
                )
            })?;
            path.pop_if_empty().extend(["v4", "spreadsheets", spreadsheet_id]);
            path.extend(segments);
        }
        Ok(url)
    }

    /// Sends an authenticated request; non-2xx statuses become `SheetError`s.
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, SheetError> {
        let token = self.token_source()?.access_token().await?;

        let mut request = self
            .http_client
            .request(method, url)
            .bearer_auth(token.expose_secret());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SheetError::timeout(format!("Sheets request timed out: {}", e))
            } else {
                SheetError::network(format!("Sheets request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SheetError::from_status(
                status.as_u16(),
                format!("Sheets API error ({}): {}", status.as_u16(), error_text),
            ));
        }

        Ok(response)
    }

    async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, SheetError> {
        let url = self.url(spreadsheet_id, &["values", range])?;
        let response = self.send(Method::GET, url, None).await?;

        let value_range: ValueRange = response.json().await.map_err(|e| {
            SheetError::invalid_response(format!("Failed to parse value range: {}", e))
        })?;

        Ok(value_range
            .values
            .into_iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect())
    }

    async fn sheet_id(&self, target: &SheetTarget) -> Result<i64, SheetError> {
        let mut url = self.url(&target.spreadsheet_id, &[])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(sheetId,title)");

        let response = self.send(Method::GET, url, None).await?;
        let metadata: SpreadsheetMetadata = response.json().await.map_err(|e| {
            SheetError::invalid_response(format!("Failed to parse spreadsheet metadata: {}", e))
        })?;

        metadata
            .sheets
            .into_iter()
            .find(|s| s.properties.title == target.sheet_name)
            .map(|s| s.properties.sheet_id)
            .ok_or_else(|| {
                SheetError::new(
                    SheetErrorCode::NotFound,
                    format!("Sheet '{}' not found", target.sheet_name),
                )
            })
    }
}

/// Quotes a tab name for A1 notation: `'My Sheet'!A1`.
pub fn a1_range(sheet_name: &str, cells: &str) -> String {
    format!("'{}'!{}", sheet_name.replace('\'', "''"), cells)
}

/// Renders a returned cell as the text the user sees.
fn cell_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn cell_to_json(cell: &CellValue) -> Value {
    match cell {
        CellValue::Text(s) => Value::String(s.clone()),
        CellValue::Number(n) => serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(n.to_string())),
    }
}

fn header_body(range: &str, headers: &[String]) -> Value {
    serde_json::json!({
        "range": range,
        "majorDimension": "ROWS",
        "values": [headers],
    })
}

fn append_body(row: &SheetRow) -> Value {
    let cells: Vec<Value> = row.cells().iter().map(cell_to_json).collect();
    serde_json::json!({
        "majorDimension": "ROWS",
        "values": [cells],
    })
}

fn autosize_body(sheet_id: i64, column_count: usize) -> Value {
    serde_json::json!({
        "requests": [{
            "autoResizeDimensions": {
                "dimensions": {
                    "sheetId": sheet_id,
                    "dimension": "COLUMNS",
                    "startIndex": 0,
                    "endIndex": column_count,
                }
            }
        }]
    })
}

#[async_trait]
impl SheetStore for GoogleSheetsStore {
    async fn read_header(&self, target: &SheetTarget) -> Result<Vec<String>, SheetError> {
        let range = a1_range(&target.sheet_name, "1:1");
        let rows = self.get_values(&target.spreadsheet_id, &range).await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    async fn write_header(
        &self,
        target: &SheetTarget,
        headers: &[String],
    ) -> Result<(), SheetError> {
        let range = a1_range(&target.sheet_name, "A1");
        let mut url = self.url(&target.spreadsheet_id, &["values", &range])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        self.send(Method::PUT, url, Some(&header_body(&range, headers)))
            .await?;

        tracing::debug!(
            spreadsheet_id = %target.spreadsheet_id,
            sheet = %target.sheet_name,
            columns = headers.len(),
            "Wrote header row"
        );
        Ok(())
    }

    async fn append_row(&self, target: &SheetTarget, row: &SheetRow) -> Result<(), SheetError> {
        let range = a1_range(&target.sheet_name, "A1");
        let append_segment = format!("{}:append", range);
        let mut url = self.url(&target.spreadsheet_id, &["values", &append_segment])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");

        self.send(Method::POST, url, Some(&append_body(row))).await?;
        Ok(())
    }

    async fn autosize_columns(
        &self,
        target: &SheetTarget,
        column_count: usize,
    ) -> Result<(), SheetError> {
        if column_count == 0 {
            return Ok(());
        }

        let sheet_id = self.sheet_id(target).await?;
        let batch_segment = format!("{}:batchUpdate", target.spreadsheet_id);

        let mut url = self.url(&target.spreadsheet_id, &[])?;
        // batchUpdate is addressed as `spreadsheets/{id}:batchUpdate`
        url.path_segments_mut()
            .map_err(|_| {
                SheetError::new(
                    SheetErrorCode::RequestRejected,
                    "Sheets base URL cannot carry a path",
                )
            })?
            .pop()
            .push(&batch_segment);

        self.send(
            Method::POST,
            url,
            Some(&autosize_body(sheet_id, column_count)),
        )
        .await?;
        Ok(())
    }

    async fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, SheetError> {
        self.get_values(spreadsheet_id, range).await
    }
}
