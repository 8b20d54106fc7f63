//! GetFormConfigHandler - Query handler for the checkout form's step list.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::form_config::{parse_form_steps, FormStep};
use crate::domain::foundation::Timestamp;
use crate::ports::{SheetError, SheetStore};

/// Default range holding the step table, below its header row.
pub const DEFAULT_FORM_CONFIG_RANGE: &str = "Form_Config!A2:K";

/// Query for the current form configuration.
#[derive(Debug, Clone, Default)]
pub struct GetFormConfigQuery;

/// Ordered form steps and the time they were read.
#[derive(Debug, Clone)]
pub struct GetFormConfigResult {
    pub form_steps: Vec<FormStep>,
    pub last_updated: Timestamp,
}

/// Errors from reading the form configuration.
#[derive(Debug, Error)]
pub enum FormConfigError {
    #[error("Failed to fetch form configuration: {0}")]
    Store(#[from] SheetError),
}

/// Where the step table lives.
#[derive(Debug, Clone)]
pub struct FormConfigSource {
    pub spreadsheet_id: String,
    pub range: String,
}

/// Handler for reading form configuration from the spreadsheet.
pub struct GetFormConfigHandler {
    sheet_store: Arc<dyn SheetStore>,
    source: FormConfigSource,
}

impl GetFormConfigHandler {
    pub fn new(sheet_store: Arc<dyn SheetStore>, source: FormConfigSource) -> Self {
        Self {
            sheet_store,
            source,
        }
    }

    pub async fn handle(
        &self,
        _query: GetFormConfigQuery,
    ) -> Result<GetFormConfigResult, FormConfigError> {
        let rows = self
            .sheet_store
            .read_range(&self.source.spreadsheet_id, &self.source.range)
            .await
            .map_err(|e| {
                tracing::error!(
                    spreadsheet_id = %self.source.spreadsheet_id,
                    range = %self.source.range,
                    error = %e,
                    "Error fetching form config"
                );
                e
            })?;

        let form_steps = parse_form_steps(&rows);
        tracing::debug!(steps = form_steps.len(), "Form configuration loaded");

        Ok(GetFormConfigResult {
            form_steps,
            last_updated: Timestamp::now(),
        })
    }
}
