//! Turns row ranges of a [`DecodedTable`] into [`Document`]s.
//!
//! Extraction never fails. A column the producer did not write, a null, a
//! value of the wrong type or a row past the end all degrade that one field
//! to `""` / `0` and the row is still emitted.

use std::ops::Range;
use crate::column_parquet_reader::{DecodedColumn, DecodedTable};
use crate::document::Document;

/// Source column names for each document field.
///
/// The defaults are the column names written by the log batch producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub message: String,
    pub message_raw: String,
    pub structured_data: String,
    pub tag: String,
    pub sender: String,
    pub groupings: String,
    pub event: String,
    pub event_id: String,
    pub timestamp: String,
    pub namespace: String,
    /// Column holding a stable record identifier. When absent or empty for a
    /// row, the row's index within its file is used instead.
    pub id_column: Option<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            message: "Message".into(),
            message_raw: "MessageRaw".into(),
            structured_data: "StructuredData".into(),
            tag: "Tag".into(),
            sender: "Sender".into(),
            groupings: "Groupings".into(),
            event: "Event".into(),
            event_id: "EventId".into(),
            timestamp: "NanoTimeStamp".into(),
            namespace: "Namespace".into(),
            id_column: Some("Id".into()),
        }
    }
}

/// Column handles resolved once per batch instead of once per cell.
struct ResolvedColumns<'a> {
    id: Option<&'a DecodedColumn>,
    message: Option<&'a DecodedColumn>,
    message_raw: Option<&'a DecodedColumn>,
    structured_data: Option<&'a DecodedColumn>,
    tag: Option<&'a DecodedColumn>,
    sender: Option<&'a DecodedColumn>,
    groupings: Option<&'a DecodedColumn>,
    event: Option<&'a DecodedColumn>,
    event_id: Option<&'a DecodedColumn>,
    timestamp: Option<&'a DecodedColumn>,
    namespace: Option<&'a DecodedColumn>,
}

impl<'a> ResolvedColumns<'a> {
    fn resolve(table: &'a DecodedTable, mapping: &ColumnMapping) -> Self {
        Self {
            id: mapping.id_column.as_deref().and_then(|name| table.column(name)),
            message: table.column(&mapping.message),
            message_raw: table.column(&mapping.message_raw),
            structured_data: table.column(&mapping.structured_data),
            tag: table.column(&mapping.tag),
            sender: table.column(&mapping.sender),
            groupings: table.column(&mapping.groupings),
            event: table.column(&mapping.event),
            event_id: table.column(&mapping.event_id),
            timestamp: table.column(&mapping.timestamp),
            namespace: table.column(&mapping.namespace),
        }
    }
}

#[inline]
fn string_field(column: Option<&DecodedColumn>, row: usize) -> String {
    column.map_or("", |c| c.string_at(row)).to_string()
}

fn document_at(columns: &ResolvedColumns<'_>, row: usize) -> Document {
    let explicit_id = columns.id.map_or("", |c| c.string_at(row));
    let id = if explicit_id.is_empty() {
        row.to_string()
    } else {
        explicit_id.to_string()
    };

    Document {
        id,
        message: string_field(columns.message, row),
        message_raw: string_field(columns.message_raw, row),
        structured_data: string_field(columns.structured_data, row),
        tag: string_field(columns.tag, row),
        sender: string_field(columns.sender, row),
        groupings: string_field(columns.groupings, row),
        event: string_field(columns.event, row),
        event_id: string_field(columns.event_id, row),
        timestamp: columns.timestamp.map_or(0, |c| c.int_at(row)),
        namespace: string_field(columns.namespace, row),
    }
}

/// Materializes one document per row of `rows`, in row order.
///
/// The range is clamped to the table, so a range running past the end only
/// yields the rows that exist.
pub fn extract_rows(table: &DecodedTable, mapping: &ColumnMapping, rows: Range<usize>) -> Vec<Document> {
    let end = rows.end.min(table.num_rows());
    let start = rows.start.min(end);
    let columns = ResolvedColumns::resolve(table, mapping);

    (start..end).map(|row| document_at(&columns, row)).collect()
}

/// Splits `[0, total_rows)` into consecutive ranges of at most `batch_rows` rows.
///
/// ```
/// # use logsearch::row_extractor::batch_ranges;
/// let ranges: Vec<_> = batch_ranges(2500, 1000).collect();
/// assert_eq!(ranges, vec![0..1000, 1000..2000, 2000..2500]);
/// ```
pub fn batch_ranges(total_rows: usize, batch_rows: usize) -> impl Iterator<Item = Range<usize>> {
    let batch_rows = batch_rows.max(1);
    (0..total_rows)
        .step_by(batch_rows)
        .map(move |start| start..(start + batch_rows).min(total_rows))
}
