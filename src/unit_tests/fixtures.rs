//! Parquet fixtures shaped like the log batches the producer writes.

use std::path::Path;
use std::sync::Arc;
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use rand::{Rng, SeedableRng};
use crate::document::Document;

pub(crate) const EVENTS: [&str; 4] = ["login", "logout", "timeout", "restart"];
const SENDERS: [&str; 3] = ["gateway", "scheduler", "billing"];

/// Generates `count` documents for a file, ids prefixed with `file_tag`.
///
/// Every message contains the word `common` and the file tag, so tests can
/// count matches per file and across files.
pub(crate) fn generate_documents(file_tag: &str, count: usize, seed: u64) -> Vec<Document> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| Document {
            id: format!("{file_tag}-{i}"),
            message: format!("common message {i} from {file_tag}"),
            message_raw: format!("<14>raw {i}"),
            structured_data: format!("{{\"row\":{i}}}"),
            tag: format!("tag{}", i % 5),
            sender: SENDERS[rng.random_range(0..SENDERS.len())].to_string(),
            groupings: "default".to_string(),
            event: EVENTS[rng.random_range(0..EVENTS.len())].to_string(),
            event_id: format!("E{i}"),
            timestamp: 1_700_000_000_000_000_000 + i as i64,
            namespace: "production".to_string(),
        })
        .collect()
}

/// Encodes documents as a Parquet file using the producer's column names.
///
/// With `with_ids` false the `Id` column is left out, so ingestion falls
/// back to row positions.
pub(crate) fn documents_to_parquet(docs: &[Document], with_ids: bool) -> Vec<u8> {
    let strings = |field: fn(&Document) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(docs.iter().map(field).collect::<Vec<_>>()))
    };

    let mut fields = Vec::new();
    let mut columns: Vec<ArrayRef> = Vec::new();
    if with_ids {
        fields.push(Field::new("Id", DataType::Utf8, false));
        columns.push(strings(|d| &d.id));
    }
    let string_columns: [(&str, fn(&Document) -> &str); 9] = [
        ("Message", |d| &d.message),
        ("MessageRaw", |d| &d.message_raw),
        ("StructuredData", |d| &d.structured_data),
        ("Tag", |d| &d.tag),
        ("Sender", |d| &d.sender),
        ("Groupings", |d| &d.groupings),
        ("Event", |d| &d.event),
        ("EventId", |d| &d.event_id),
        ("Namespace", |d| &d.namespace),
    ];
    for (name, field) in string_columns {
        fields.push(Field::new(name, DataType::Utf8, false));
        columns.push(strings(field));
    }
    fields.push(Field::new("NanoTimeStamp", DataType::Int64, false));
    columns.push(Arc::new(Int64Array::from(docs.iter().map(|d| d.timestamp).collect::<Vec<_>>())));

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_max_row_group_size(700)
        .build();
    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, schema, Some(props)).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    buffer
}

/// Writes a generated log file into `dir` and returns the documents it holds.
pub(crate) fn write_log_file(dir: &Path, file_tag: &str, count: usize, seed: u64) -> Vec<Document> {
    let docs = generate_documents(file_tag, count, seed);
    std::fs::write(dir.join(format!("{file_tag}.parquet")), documents_to_parquet(&docs, true)).unwrap();
    docs
}

/// Writes a file that carries the Parquet magic numbers but no valid metadata.
pub(crate) fn write_corrupt_file(path: &Path) {
    let mut bytes = b"PAR1".to_vec();
    bytes.extend_from_slice(&[0xAB; 64]);
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(b"PAR1");
    std::fs::write(path, bytes).unwrap();
}
