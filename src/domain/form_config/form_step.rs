//! Form step descriptors read from the configuration sheet.
//!
//! Each sheet row describes one step of the checkout form. Columns, in order:
//! stepId, questionText, fieldType, isRequired, options, placeholder,
//! validationType, displayOrder, conditionalShow, autoAdvance, section.

use serde::Serialize;

/// Field type whose step is an intro screen rather than a question.
pub const FIELD_TYPE_WELCOME: &str = "welcome";
/// Field type whose `options` cell is parsed into choices.
pub const FIELD_TYPE_SELECT: &str = "select";
/// Section used when the row leaves it blank.
pub const DEFAULT_SECTION: &str = "default";

/// A selectable choice for `select` steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormOption {
    pub value: String,
    pub label: String,
}

/// One step of the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStep {
    pub id: String,
    pub title: String,
    pub is_question: bool,
    pub is_required: bool,
    pub field_type: String,
    pub options: Vec<FormOption>,
    pub placeholder: String,
    pub validation_type: String,
    pub display_order: i64,
    pub conditional_show: String,
    pub auto_advance: bool,
    pub section: String,
}

impl FormStep {
    /// Builds a step from one sheet row. Short rows are padded with blanks.
    pub fn from_row(row: &[String]) -> Self {
        let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("");

        let field_type = cell(2).to_string();
        let options = if field_type == FIELD_TYPE_SELECT {
            parse_options(cell(4))
        } else {
            Vec::new()
        };
        let section = match cell(10) {
            "" => DEFAULT_SECTION.to_string(),
            s => s.to_string(),
        };

        FormStep {
            id: cell(0).to_string(),
            title: cell(1).to_string(),
            is_question: field_type != FIELD_TYPE_WELCOME,
            is_required: is_sheet_true(cell(3)),
            options,
            placeholder: cell(5).to_string(),
            validation_type: cell(6).to_string(),
            display_order: parse_display_order(cell(7)),
            conditional_show: cell(8).to_string(),
            auto_advance: is_sheet_true(cell(9)),
            section,
            field_type,
        }
    }
}

/// Builds steps from sheet rows, sorted stably by display order.
pub fn parse_form_steps(rows: &[Vec<String>]) -> Vec<FormStep> {
    let mut steps: Vec<FormStep> = rows.iter().map(|row| FormStep::from_row(row)).collect();
    steps.sort_by_key(|step| step.display_order);
    steps
}

/// Parses a comma-separated option list. Entries are `value:label` or a bare
/// `value` that doubles as its label.
pub fn parse_options(raw: &str) -> Vec<FormOption> {
    if raw.is_empty() {
        return Vec::new();
    }

    raw.split(',')
        .map(|entry| {
            if entry.contains(':') {
                let mut parts = entry.split(':');
                let value = parts.next().unwrap_or("").trim().to_string();
                let label = parts.next().unwrap_or("").trim().to_string();
                FormOption { value, label }
            } else {
                let value = entry.trim().to_string();
                FormOption {
                    label: value.clone(),
                    value,
                }
            }
        })
        .collect()
}

/// Sheets renders checkbox cells as `TRUE`/`FALSE`; nothing else counts.
fn is_sheet_true(cell: &str) -> bool {
    cell == "TRUE"
}

/// Leading integer of the cell, or 0 when there is none.
fn parse_display_order(cell: &str) -> i64 {
    let trimmed = cell.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}
