//! Line-oriented field extraction.
//!
//! A record is scanned one line at a time. Each trimmed line is checked against [`LABELS`] in
//! order; the first label contained in the line claims it and no further labels are tried. The
//! value is whatever follows the last `:` on the line, trimmed.
//!
//! Extraction is best effort. Lines that match nothing are skipped, and dates that fail to parse
//! are kept verbatim. Nothing in this module returns an error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{LABELS, RAW_SUFFIX, READABLE_SUFFIX};
use crate::dates::parse_extraction_date;

/// How a labelled value is stored once found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Stored verbatim under the field name.
    Text,
    /// Stored as raw, canonical and (when parseable) readable variants.
    Date,
}

/// One entry of the label dispatch table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Label {
    pub prefix: &'static str,
    pub field: &'static str,
    pub kind: FieldKind,
}

impl Label {
    pub const fn new(prefix: &'static str, field: &'static str, kind: FieldKind) -> Self {
        Self {
            prefix,
            field,
            kind,
        }
    }

    fn matches(&self, line: &str) -> bool {
        line.contains(self.prefix)
    }
}

/// Field name to value mapping produced from a single record.
///
/// Keys keep the order in which they were first inserted. Absent fields are missing keys, never
/// nulls.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedFields(Map<String, Value>);

impl ExtractedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), Value::String(value.into()));
    }

    fn insert_date(&mut self, field: &str, raw: &str) {
        self.insert(format!("{field}{RAW_SUFFIX}"), raw);

        match parse_extraction_date(raw) {
            Some(parsed) => {
                self.insert(field, parsed.iso());
                self.insert(format!("{field}{READABLE_SUFFIX}"), parsed.readable());
            }
            None => {
                tracing::debug!("unparseable date for {}: {:?}", field, raw);
                self.insert(field, raw);
            }
        }
    }
}

/// Returns the first label in table order that claims `line`.
pub fn match_label(line: &str) -> Option<&'static Label> {
    LABELS.iter().find(|label| label.matches(line))
}

/// Text after the last `:` in `line`, trimmed.
fn value_after_last_colon(line: &str) -> &str {
    line.rsplit(':').next().unwrap_or_default().trim()
}

/// Extracts every labelled field from a record.
///
/// When the same label appears on more than one line, the last occurrence wins.
pub fn extract_fields(content: &str) -> ExtractedFields {
    let mut fields = ExtractedFields::new();

    for line in content.split('\n') {
        let line = line.trim();

        let Some(label) = match_label(line) else {
            continue;
        };

        let value = value_after_last_colon(line);
        match label.kind {
            FieldKind::Text => fields.insert(label.field, value),
            FieldKind::Date => fields.insert_date(label.field, value),
        }
    }

    fields
}
