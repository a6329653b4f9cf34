//! CSV serialization of a record set.
//!
//! The header row holds the keys of the first record in insertion order and
//! is quoted only where needed. Records without any field are skipped when
//! picking that first record, so a leading `{}` still exports as a row of
//! empty cells. Every data value is wrapped in double
//! quotes; embedded quotes are doubled. Rows end with `\r\n`.

use std::borrow::Cow;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::Value;

use tdv_model::Record;

use crate::error::{ExportError, Result};

/// Display text of one CSV cell. Objects and arrays become one-line JSON;
/// null and missing values are empty.
pub fn cell_text(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(text)) => Cow::Borrowed(text.as_str()),
        Some(other @ (Value::Array(_) | Value::Object(_))) => Cow::Owned(other.to_string()),
        Some(scalar) => Cow::Owned(scalar.to_string()),
    }
}

/// Columns of a record set: the keys of its first record that has any field.
pub fn columns(records: &[Record]) -> Vec<&str> {
    records
        .iter()
        .find(|record| !record.is_empty())
        .map(|first| first.keys().collect())
        .unwrap_or_default()
}

pub fn to_csv(label: &str, records: &[Record]) -> Result<Vec<u8>> {
    let headers = columns(records);
    if headers.is_empty() {
        return Err(ExportError::Empty {
            label: label.to_string(),
        });
    }

    let mut header = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());
    header.write_record(&headers)?;
    let buffer = header
        .into_inner()
        .map_err(|error| csv::Error::from(error.into_error()))?;

    let mut rows = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Always)
        .from_writer(buffer);
    for record in records {
        // Lookup by literal key: a dotted header names a top-level field here.
        let row = headers
            .iter()
            .map(|column| cell_text(record.fields().get(*column)));
        rows.write_record(row.map(|cell| cell.into_owned()))?;
    }
    rows.into_inner()
        .map_err(|error| ExportError::from(csv::Error::from(error.into_error())))
}
