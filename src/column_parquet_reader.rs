use std::path::PathBuf;
use arrow::array::{Array, ArrayRef, Int64Array, StringArray, new_empty_array};
use arrow::compute::{cast, concat};
use arrow::datatypes::{DataType, TimeUnit};
use arrow::error::ArrowError;
use bytes::Bytes;
use hashbrown::HashMap;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tracing::debug;
use crate::error::DecodeError;
use crate::utils::file_interaction::read_file_bytes;

/// Parquet footer size: 4 bytes metadata length + 4 bytes "PAR1" magic number.
pub const FOOTER_SIZE: usize = 8;

/// Parquet files start and end with this magic number.
const PARQUET_MAGIC: &[u8; 4] = b"PAR1";

/// Rows per record batch requested from the arrow reader while decoding.
pub const DECODE_BATCH_SIZE: usize = 8192;

/// Source of Parquet data for decoding.
///
/// The bytes variant lets tests and callers decode files generated in memory
/// without touching the filesystem.
///
/// # Examples
///
/// ```
/// use logsearch::ParquetSource;
///
/// let source = ParquetSource::from(std::path::Path::new("batches/part-0.parquet"));
/// assert_eq!(source.name(), "batches/part-0.parquet");
///
/// let source = ParquetSource::from(vec![0u8; 4]);
/// assert_eq!(source.name(), "<memory>");
/// ```
#[derive(Debug, Clone)]
pub enum ParquetSource {
    /// Path to a local Parquet file
    Path(PathBuf),
    /// In-memory Parquet data as bytes
    Bytes(Bytes),
}

impl ParquetSource {
    /// Label used in errors and logs.
    pub fn name(&self) -> String {
        match self {
            ParquetSource::Path(path) => path.display().to_string(),
            ParquetSource::Bytes(_) => "<memory>".to_string(),
        }
    }
}

impl From<Vec<u8>> for ParquetSource {
    fn from(vec: Vec<u8>) -> Self {
        ParquetSource::Bytes(Bytes::from(vec))
    }
}

impl From<Bytes> for ParquetSource {
    fn from(bytes: Bytes) -> Self {
        ParquetSource::Bytes(bytes)
    }
}

impl From<PathBuf> for ParquetSource {
    fn from(path: PathBuf) -> Self {
        ParquetSource::Path(path)
    }
}

impl From<&std::path::Path> for ParquetSource {
    fn from(path: &std::path::Path) -> Self {
        ParquetSource::Path(path.to_path_buf())
    }
}

/// Values of one column after normalization.
///
/// String-like arrow types collapse to `Utf8`, integer-like types (and
/// nanosecond timestamps) to `Int64`. Everything else is kept only as a
/// type tag so lookups can fall back to defaults.
#[derive(Debug)]
enum ColumnValues {
    Utf8(StringArray),
    Int64(Int64Array),
    Unsupported(DataType),
}

/// A fully decoded column, readable concurrently by any number of batch workers.
#[derive(Debug)]
pub struct DecodedColumn {
    name: String,
    len: usize,
    values: ColumnValues,
}

impl DecodedColumn {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_string(&self) -> bool {
        matches!(self.values, ColumnValues::Utf8(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self.values, ColumnValues::Int64(_))
    }

    /// Arrow type of a column that is neither string nor integer like.
    pub fn unsupported_type(&self) -> Option<&DataType> {
        match &self.values {
            ColumnValues::Unsupported(data_type) => Some(data_type),
            _ => None,
        }
    }

    /// String value at `row`, or `""` for out-of-range rows, nulls and
    /// non-string columns.
    pub fn string_at(&self, row: usize) -> &str {
        match &self.values {
            ColumnValues::Utf8(array) if row < array.len() && array.is_valid(row) => array.value(row),
            _ => "",
        }
    }

    /// Integer value at `row`, or `0` for out-of-range rows, nulls and
    /// non-integer columns.
    pub fn int_at(&self, row: usize) -> i64 {
        match &self.values {
            ColumnValues::Int64(array) if row < array.len() && array.is_valid(row) => array.value(row),
            _ => 0,
        }
    }
}

/// An in-memory table decoded from one Parquet file.
///
/// Columns are addressed by name. Parquet allows duplicate column names;
/// lookups resolve to the first occurrence.
#[derive(Debug)]
pub struct DecodedTable {
    source_name: String,
    num_rows: usize,
    columns: Vec<DecodedColumn>,
    column_indices: HashMap<String, usize>,
}

impl DecodedTable {
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_indices.get(name).copied()
    }

    pub fn column_at(&self, index: usize) -> Option<&DecodedColumn> {
        self.columns.get(index)
    }

    pub fn column(&self, name: &str) -> Option<&DecodedColumn> {
        self.column_index(name).and_then(|index| self.columns.get(index))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(DecodedColumn::name)
    }

    /// String value of column `name` at `row`; `""` if anything is missing.
    pub fn string_at(&self, row: usize, name: &str) -> &str {
        self.column(name).map_or("", |column| column.string_at(row))
    }

    /// Integer value of column `name` at `row`; `0` if anything is missing.
    pub fn int_at(&self, row: usize, name: &str) -> i64 {
        self.column(name).map_or(0, |column| column.int_at(row))
    }
}

/// Extracts metadata length from Parquet footer bytes.
///
/// ```text
/// [... file content ...]
/// [metadata bytes]
/// [4 bytes: metadata length (little-endian u32)]
/// [4 bytes: "PAR1" magic number]
/// ```
fn read_metadata_length(footer_bytes: &[u8]) -> Result<usize, String> {
    if footer_bytes.len() < FOOTER_SIZE {
        return Err("Footer too short".into());
    }

    let magic = &footer_bytes[footer_bytes.len() - 4..];
    if magic != PARQUET_MAGIC {
        return Err("Invalid Parquet file - missing PAR1 magic number".into());
    }

    let length_bytes = &footer_bytes[footer_bytes.len() - 8..footer_bytes.len() - 4];
    let metadata_length = u32::from_le_bytes([
        length_bytes[0],
        length_bytes[1],
        length_bytes[2],
        length_bytes[3],
    ]) as usize;

    Ok(metadata_length)
}

/// Cheap structural checks so obviously foreign files fail with a clear reason
/// before the parquet reader sees them.
fn validate_layout(bytes: &[u8]) -> Result<(), String> {
    if bytes.len() < PARQUET_MAGIC.len() + FOOTER_SIZE {
        return Err(format!("file is only {} bytes", bytes.len()));
    }
    if &bytes[..PARQUET_MAGIC.len()] != PARQUET_MAGIC {
        return Err("Invalid Parquet file - missing PAR1 header".into());
    }

    let metadata_length = read_metadata_length(&bytes[bytes.len() - FOOTER_SIZE..])?;
    if metadata_length + FOOTER_SIZE + PARQUET_MAGIC.len() > bytes.len() {
        return Err(format!(
            "metadata length {} exceeds file size {}, Parquet file is corrupt",
            metadata_length,
            bytes.len()
        ));
    }
    Ok(())
}

fn normalize_column(name: &str, array: ArrayRef) -> Result<DecodedColumn, ArrowError> {
    let len = array.len();
    let values = match array.data_type() {
        DataType::Utf8 => string_values(&array),
        DataType::LargeUtf8 | DataType::Utf8View => string_values(&cast(&array, &DataType::Utf8)?),
        DataType::Dictionary(_, value_type)
            if matches!(value_type.as_ref(), DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View) =>
        {
            string_values(&cast(&array, &DataType::Utf8)?)
        }
        DataType::Int64 => integer_values(&array),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Timestamp(TimeUnit::Nanosecond, _) => integer_values(&cast(&array, &DataType::Int64)?),
        other => ColumnValues::Unsupported(other.clone()),
    };

    Ok(DecodedColumn {
        name: name.to_string(),
        len,
        values,
    })
}

fn string_values(array: &ArrayRef) -> ColumnValues {
    match array.as_any().downcast_ref::<StringArray>() {
        Some(strings) => ColumnValues::Utf8(strings.clone()),
        None => ColumnValues::Unsupported(array.data_type().clone()),
    }
}

fn integer_values(array: &ArrayRef) -> ColumnValues {
    match array.as_any().downcast_ref::<Int64Array>() {
        Some(integers) => ColumnValues::Int64(integers.clone()),
        None => ColumnValues::Unsupported(array.data_type().clone()),
    }
}

/// Decodes a complete Parquet file held in memory.
///
/// All row groups are read and each top-level column is concatenated into a
/// single array, so row `n` of the table is row `n` of the file.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidFormat`] when the bytes are not laid out as a
/// Parquet file, and [`DecodeError::Parquet`] / [`DecodeError::Arrow`] when
/// the metadata or column data cannot be decoded.
pub fn decode_parquet_bytes(bytes: Bytes, source_name: &str) -> Result<DecodedTable, DecodeError> {
    validate_layout(&bytes).map_err(|reason| DecodeError::InvalidFormat {
        source_name: source_name.to_string(),
        reason,
    })?;

    let parquet_error = |source| DecodeError::Parquet {
        source_name: source_name.to_string(),
        source,
    };
    let arrow_error = |source| DecodeError::Arrow {
        source_name: source_name.to_string(),
        source,
    };

    let builder = ParquetRecordBatchReaderBuilder::try_new(bytes)
        .map_err(parquet_error)?
        .with_batch_size(DECODE_BATCH_SIZE);
    let schema = builder.schema().clone();
    let reader = builder.build().map_err(parquet_error)?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch.map_err(arrow_error)?);
    }
    let num_rows: usize = batches.iter().map(|batch| batch.num_rows()).sum();

    let mut columns = Vec::with_capacity(schema.fields().len());
    let mut column_indices = HashMap::with_capacity(schema.fields().len());

    for (column_index, field) in schema.fields().iter().enumerate() {
        let array: ArrayRef = match batches.as_slice() {
            [] => new_empty_array(field.data_type()),
            [single] => single.column(column_index).clone(),
            many => {
                let parts: Vec<&dyn Array> = many
                    .iter()
                    .map(|batch| batch.column(column_index).as_ref())
                    .collect();
                concat(&parts).map_err(arrow_error)?
            }
        };

        let column = normalize_column(field.name(), array).map_err(arrow_error)?;
        if let Some(data_type) = column.unsupported_type() {
            debug!(source = source_name, column = column.name(), %data_type, "Column type not readable, lookups fall back to defaults");
        }
        columns.push(column);
        column_indices.entry(field.name().clone()).or_insert(column_index);
    }

    debug!(
        source = source_name,
        rows = num_rows,
        columns = columns.len(),
        batches = batches.len(),
        "Decoded parquet table"
    );

    Ok(DecodedTable {
        source_name: source_name.to_string(),
        num_rows,
        columns,
        column_indices,
    })
}

/// Reads and decodes one Parquet source.
///
/// File bytes are fetched through the object store; decoding runs on the
/// blocking thread pool.
pub async fn read_table(source: ParquetSource) -> Result<DecodedTable, DecodeError> {
    let source_name = source.name();
    let bytes = match source {
        ParquetSource::Path(path) => read_file_bytes(&path).await.map_err(|source| DecodeError::Open {
            source_name: source_name.clone(),
            source,
        })?,
        ParquetSource::Bytes(bytes) => bytes,
    };

    let name = source_name.clone();
    tokio::task::spawn_blocking(move || decode_parquet_bytes(bytes, &name))
        .await
        .map_err(|join_error| DecodeError::Interrupted {
            source_name,
            reason: join_error.to_string(),
        })?
}
