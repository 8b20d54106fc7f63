//! Row mapping: projects a record onto a header order.

use serde::Serialize;

use super::record::{FieldValue, NormalizedRecord};
use super::schema::SheetSchema;

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }
}

impl From<&FieldValue> for CellValue {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Text(s) => CellValue::Text(s.clone()),
            FieldValue::Number(n) => CellValue::Number(*n),
            FieldValue::List(items) => CellValue::Text(items.join("\n")),
        }
    }
}

/// One data row, positionally aligned with the schema it was mapped against.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SheetRow(Vec<CellValue>);

impl SheetRow {
    pub fn cells(&self) -> &[CellValue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_cells(self) -> Vec<CellValue> {
        self.0
    }
}

/// Maps `record` onto `schema`.
///
/// Each header takes the record's value for that field, or empty text. The
/// returned row always has exactly `schema.len()` cells.
pub fn map_row(schema: &SheetSchema, record: &NormalizedRecord) -> SheetRow {
    let cells = schema
        .headers()
        .iter()
        .map(|header| {
            if header.trim().is_empty() {
                return CellValue::empty();
            }
            record
                .get(header)
                .map(CellValue::from)
                .unwrap_or_else(CellValue::empty)
        })
        .collect();

    SheetRow(cells)
}
