//! Sheet schema reconciliation.
//!
//! The destination sheet's first row is its schema. It only ever grows:
//! existing headers keep their positions, and new fields are appended to
//! the right. There is no locking around the header row; two concurrent
//! reconciliations may both write, but neither can move an existing column.

use std::collections::BTreeSet;

use super::record::{field_key, SYSTEM_FIELDS};

/// Ordered column headers of a destination sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetSchema {
    headers: Vec<String>,
}

/// Outcome of reconciling a schema with a record's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Full header list to use for the row.
    pub schema: SheetSchema,
    /// Headers appended by this reconciliation, in order.
    pub added: Vec<String>,
}

impl Reconciliation {
    /// True when the header row must be written back before appending.
    pub fn requires_write(&self) -> bool {
        !self.added.is_empty()
    }
}

impl SheetSchema {
    /// Wraps a header row exactly as read from the sheet.
    ///
    /// Blank cells are kept so positions line up with existing data.
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Returns true if a non-blank header matches `field`.
    pub fn contains(&self, field: &str) -> bool {
        let key = field_key(field);
        !key.is_empty() && self.headers.iter().any(|h| field_key(h) == key)
    }

    /// Computes the header list needed to hold `field_names`.
    ///
    /// Existing headers stay in place. Missing system fields follow in
    /// their fixed order, then missing dynamic fields sorted
    /// lexicographically. Reconciling the result again adds nothing.
    pub fn reconcile<'a, I>(&self, field_names: I) -> Reconciliation
    where
        I: IntoIterator<Item = &'a str>,
    {
        let present: BTreeSet<&str> = self
            .headers
            .iter()
            .map(|h| field_key(h))
            .filter(|k| !k.is_empty())
            .collect();

        let wanted: BTreeSet<&str> = field_names
            .into_iter()
            .map(field_key)
            .filter(|k| !k.is_empty())
            .collect();

        let missing_system = SYSTEM_FIELDS
            .iter()
            .copied()
            .filter(|f| wanted.contains(f) && !present.contains(f));

        // BTreeSet iteration is already lexicographic
        let missing_dynamic = wanted
            .iter()
            .copied()
            .filter(|f| !SYSTEM_FIELDS.contains(f) && !present.contains(f));

        let added: Vec<String> = missing_system
            .chain(missing_dynamic)
            .map(str::to_string)
            .collect();

        let mut headers = self.headers.clone();
        headers.extend(added.iter().cloned());

        Reconciliation {
            schema: SheetSchema { headers },
            added,
        }
    }
}
