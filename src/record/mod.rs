//! Row materialization: pairing a header sequence with one raw row.
//!
//! [`RecordBuilder`] is purely structural; type coercion happens later in
//! [`crate::convert`]. Short rows are padded with nulls, trailing extra
//! cells are dropped.

use std::collections::HashMap;

use serde::Serialize;

use crate::convert::FieldValue;

// =============================================================================
// Record
// =============================================================================

/// One materialized row, keyed by column header.
///
/// Duplicate headers overwrite prior values (last wins, following
/// header/row pairing order). Serializes as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    #[serde(flatten)]
    fields: HashMap<String, FieldValue>,
}

impl Record {
    /// Set a field, replacing any previous value under the same key.
    pub fn insert(&mut self, field: String, value: FieldValue) {
        self.fields.insert(field, value);
    }

    /// Look up a field value.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(field, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    /// Iterate with mutable access to the values.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut FieldValue)> {
        self.fields.iter_mut()
    }
}

impl IntoIterator for Record {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::hash_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

// =============================================================================
// RecordBuilder
// =============================================================================

/// Builds [`Record`]s from raw rows against a fixed header sequence.
///
/// Constructed once per run, after the header row has been read.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    headers: Vec<String>,
}

impl RecordBuilder {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers }
    }

    /// The header sequence this builder pairs rows against.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Pair the headers with one raw row.
    ///
    /// The result always has exactly one entry per header: cells missing
    /// from a short row become [`FieldValue::Null`], and cells beyond the
    /// header count are dropped.
    pub fn build<'a, I>(&self, cells: I) -> Record
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut cells = cells.into_iter();
        let mut record = Record::default();

        for header in &self.headers {
            let value = match cells.next() {
                Some(cell) => FieldValue::Text(cell.to_string()),
                None => FieldValue::Null,
            };
            record.insert(header.clone(), value);
        }

        record
    }
}
