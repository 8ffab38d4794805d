//! CSV decoding into [`Record`]s and encoding of output tables.

use crate::core::Record;
use crate::utils::error::{EtlError, Result};
use serde::Serialize;
use std::collections::HashMap;

/// Decode a CSV export. Headers are trimmed; short rows are padded with
/// blanks. Fails if any of `required` is not a header.
pub fn parse_records(data: &[u8], required: &[&str]) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    if let Some(missing) = required
        .iter()
        .find(|column| !headers.iter().any(|header| header == column.trim()))
    {
        return Err(EtlError::MissingColumnError {
            column: missing.to_string(),
        });
    }

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let data: HashMap<String, String> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), row.get(i).unwrap_or_default().to_string()))
            .collect();
        // Header is spreadsheet row 1.
        records.push(Record::new(index + 2, data));
    }

    tracing::debug!("Decoded {} rows with {} columns", records.len(), headers.len());
    Ok(records)
}

/// True when the export carries `column` at all, blank or not.
pub fn has_column(records: &[Record], column: &str) -> bool {
    records
        .first()
        .is_some_and(|record| record.data.contains_key(column.trim()))
}

/// Encode rows under an explicit header, for tables whose columns are only
/// known at run time.
pub fn encode_records<I>(header: &[String], rows: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

/// Encode fixed-schema rows; the header comes from the field names.
pub fn serialize_rows<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}
