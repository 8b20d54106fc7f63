//! Normalized submission record.
//!
//! A flat mapping of field name to value, built from a completed payment
//! session. The shape is open: beyond the system fields, any metadata key the
//! checkout form sent becomes a field.

use std::collections::BTreeMap;

use serde::Serialize;

/// Field holding the RFC 3339 processing time.
pub const FIELD_TIMESTAMP: &str = "timestamp";
/// Field holding the customer's display name.
pub const FIELD_NAME: &str = "name";
/// Field holding the customer's email.
pub const FIELD_EMAIL: &str = "email";
/// Field holding the payment status label.
pub const FIELD_PAYMENT_STATUS: &str = "paymentStatus";
/// Field holding the provider payment id.
pub const FIELD_PAYMENT_ID: &str = "paymentId";
/// Field holding the amount in major currency units.
pub const FIELD_PAYMENT_AMOUNT: &str = "paymentAmount";
/// Metadata key carrying comma-joined photo URLs.
pub const FIELD_PHOTO_URLS: &str = "photoUrls";
/// Metadata key the checkout form uses for the customer's name.
pub const METADATA_CUSTOMER_NAME: &str = "customerName";

/// System fields in the order they are added to a sheet header.
pub const SYSTEM_FIELDS: [&str; 6] = [
    FIELD_TIMESTAMP,
    FIELD_NAME,
    FIELD_EMAIL,
    FIELD_PAYMENT_STATUS,
    FIELD_PAYMENT_ID,
    FIELD_PAYMENT_AMOUNT,
];

/// Returns true if `name` is one of the system fields.
pub fn is_system_field(name: &str) -> bool {
    SYSTEM_FIELDS.contains(&field_key(name))
}

/// Canonical key used to match header cells against record fields.
///
/// Surrounding whitespace is ignored; everything else (case, separators)
/// is significant. Both the schema reconciler and the row mapper match
/// through this function.
pub fn field_key(name: &str) -> &str {
    name.trim()
}

/// Converts an amount in minor units to major units.
///
/// Assumes a two-decimal currency. Zero-decimal currencies (JPY, KRW) and
/// three-decimal ones (KWD) are off by a power of ten.
pub fn minor_to_major(amount: i64) -> f64 {
    amount as f64 / 100.0
}

/// A single field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    List(Vec<String>),
}

impl FieldValue {
    /// Empty text, the default for absent provider values.
    pub fn empty() -> Self {
        FieldValue::Text(String::new())
    }

    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Returns the text if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

/// Flattened field name to value mapping for one submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl NormalizedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value under the same key.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        self.fields
            .insert(field_key(&name).to_string(), value.into());
    }

    /// Looks up a field by name, matching through [`field_key`].
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(field_key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(field_key(name))
    }

    /// Field names in lexicographic order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Names of the non-system fields, in lexicographic order.
    pub fn dynamic_field_names(&self) -> impl Iterator<Item = &str> {
        self.field_names().filter(|name| !is_system_field(name))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for NormalizedRecord
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = NormalizedRecord::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}
