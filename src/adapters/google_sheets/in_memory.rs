//! In-memory sheet store for testing.
//!
//! Behaves like a spreadsheet with append-only tabs. Supports:
//! - Seeding header rows and arbitrary ranges
//! - Error injection per operation, for a fixed number of calls
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::submission::{CellValue, SheetRow};
use crate::ports::{SheetError, SheetStore, SheetTarget};

/// Sheet store operations, for error injection and call tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetOperation {
    ReadHeader,
    WriteHeader,
    AppendRow,
    AutosizeColumns,
    ReadRange,
}

/// In-memory `SheetStore`.
#[derive(Default, Clone)]
pub struct InMemorySheetStore {
    inner: Arc<Mutex<StoreState>>,
}

#[derive(Default)]
struct TabState {
    header: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

#[derive(Default)]
struct StoreState {
    tabs: HashMap<(String, String), TabState>,

    /// Fixed results for `read_range`, keyed by spreadsheet id and range.
    ranges: HashMap<(String, String), Vec<Vec<String>>>,

    /// Errors to return, with the number of calls they apply to.
    failures: HashMap<SheetOperation, (SheetError, usize)>,

    /// Track method calls for assertions.
    call_log: Vec<SheetOperation>,
}

fn key(target: &SheetTarget) -> (String, String) {
    (target.spreadsheet_id.clone(), target.sheet_name.clone())
}

impl InMemorySheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Seed the header row of a tab.
    pub fn set_header(&self, target: &SheetTarget, headers: &[&str]) {
        let mut state = self.inner.lock().unwrap();
        state.tabs.entry(key(target)).or_default().header =
            headers.iter().map(|h| h.to_string()).collect();
    }

    /// Seed the result of `read_range`.
    pub fn set_range(&self, spreadsheet_id: &str, range: &str, rows: Vec<Vec<String>>) {
        self.inner
            .lock()
            .unwrap()
            .ranges
            .insert((spreadsheet_id.to_string(), range.to_string()), rows);
    }

    /// Fail the next call to `operation`.
    pub fn fail_next(&self, operation: SheetOperation, error: SheetError) {
        self.fail_times(operation, error, 1);
    }

    /// Fail the next `times` calls to `operation`.
    pub fn fail_times(&self, operation: SheetOperation, error: SheetError, times: usize) {
        self.inner
            .lock()
            .unwrap()
            .failures
            .insert(operation, (error, times));
    }

    /// Fail every call to `operation`.
    pub fn fail_always(&self, operation: SheetOperation, error: SheetError) {
        self.fail_times(operation, error, usize::MAX);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Inspection
    // ════════════════════════════════════════════════════════════════════════════

    /// Current header row of a tab.
    pub fn header(&self, target: &SheetTarget) -> Vec<String> {
        let state = self.inner.lock().unwrap();
        state
            .tabs
            .get(&key(target))
            .map(|t| t.header.clone())
            .unwrap_or_default()
    }

    /// Data rows appended to a tab (excluding the header).
    pub fn rows(&self, target: &SheetTarget) -> Vec<Vec<CellValue>> {
        let state = self.inner.lock().unwrap();
        state
            .tabs
            .get(&key(target))
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<SheetOperation> {
        self.inner.lock().unwrap().call_log.clone()
    }

    /// Number of calls to `operation`.
    pub fn call_count(&self, operation: SheetOperation) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|op| **op == operation)
            .count()
    }

    /// Records the call and returns any injected failure.
    fn begin(&self, state: &mut StoreState, operation: SheetOperation) -> Result<(), SheetError> {
        state.call_log.push(operation);

        let Some((error, remaining)) = state.failures.get_mut(&operation) else {
            return Ok(());
        };
        let error = error.clone();
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            state.failures.remove(&operation);
        }
        Err(error)
    }
}

#[async_trait]
impl SheetStore for InMemorySheetStore {
    async fn read_header(&self, target: &SheetTarget) -> Result<Vec<String>, SheetError> {
        let mut state = self.inner.lock().unwrap();
        self.begin(&mut state, SheetOperation::ReadHeader)?;
        Ok(state
            .tabs
            .get(&key(target))
            .map(|t| t.header.clone())
            .unwrap_or_default())
    }

    async fn write_header(
        &self,
        target: &SheetTarget,
        headers: &[String],
    ) -> Result<(), SheetError> {
        let mut state = self.inner.lock().unwrap();
        self.begin(&mut state, SheetOperation::WriteHeader)?;
        state.tabs.entry(key(target)).or_default().header = headers.to_vec();
        Ok(())
    }

    async fn append_row(&self, target: &SheetTarget, row: &SheetRow) -> Result<(), SheetError> {
        let mut state = self.inner.lock().unwrap();
        self.begin(&mut state, SheetOperation::AppendRow)?;
        state
            .tabs
            .entry(key(target))
            .or_default()
            .rows
            .push(row.cells().to_vec());
        Ok(())
    }

    async fn autosize_columns(
        &self,
        _target: &SheetTarget,
        _column_count: usize,
    ) -> Result<(), SheetError> {
        let mut state = self.inner.lock().unwrap();
        self.begin(&mut state, SheetOperation::AutosizeColumns)
    }

    async fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, SheetError> {
        let mut state = self.inner.lock().unwrap();
        self.begin(&mut state, SheetOperation::ReadRange)?;
        Ok(state
            .ranges
            .get(&(spreadsheet_id.to_string(), range.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::submission::{map_row, FieldValue, NormalizedRecord, SheetSchema};

    fn target() -> SheetTarget {
        SheetTarget::new("ss1", "Sheet1")
    }

    #[tokio::test]
    async fn header_round_trips() {
        let store = InMemorySheetStore::new();
        assert!(store.read_header(&target()).await.unwrap().is_empty());

        store
            .write_header(&target(), &["a".to_string(), "b".to_string()])
            .await
            .unwrap();

        assert_eq!(store.read_header(&target()).await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn appended_rows_are_kept_in_order() {
        let store = InMemorySheetStore::new();
        let schema = SheetSchema::new(vec!["n".to_string()]);
        for n in [1.0, 2.0] {
            let record: NormalizedRecord = [("n", FieldValue::Number(n))].into_iter().collect();
            store
                .append_row(&target(), &map_row(&schema, &record))
                .await
                .unwrap();
        }

        assert_eq!(
            store.rows(&target()),
            vec![vec![CellValue::Number(1.0)], vec![CellValue::Number(2.0)]]
        );
    }

    #[tokio::test]
    async fn fail_next_applies_once() {
        let store = InMemorySheetStore::new();
        store.fail_next(SheetOperation::ReadHeader, SheetError::network("blip"));

        assert!(store.read_header(&target()).await.is_err());
        assert!(store.read_header(&target()).await.is_ok());
        assert_eq!(store.call_count(SheetOperation::ReadHeader), 2);
    }

    #[tokio::test]
    async fn fail_always_persists() {
        let store = InMemorySheetStore::new();
        store.fail_always(SheetOperation::AutosizeColumns, SheetError::network("x"));

        for _ in 0..3 {
            assert!(store.autosize_columns(&target(), 3).await.is_err());
        }
    }

    #[tokio::test]
    async fn seeded_ranges_are_returned() {
        let store = InMemorySheetStore::new();
        store.set_range("ss1", "Form_Config!A2:K", vec![vec!["q1".to_string()]]);

        let rows = store.read_range("ss1", "Form_Config!A2:K").await.unwrap();

        assert_eq!(rows, vec![vec!["q1".to_string()]]);
        assert!(store.read_range("ss1", "Other!A1").await.unwrap().is_empty());
    }
}
