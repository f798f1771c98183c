use csv::{ReaderBuilder, WriterBuilder};

use crate::core::error::{MerchsumError, Result};
use crate::core::types::DataTable;

use std::fs;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Read a delimited export into a table.
///
/// Headerless mode is used for sales exports, whose first rows are a
/// report preamble rather than column names.
pub fn read_csv_table(path: &Path, headerless: bool) -> Result<DataTable> {
    let bytes = fs::read(path)?;
    parse_csv_bytes(&bytes, headerless)
}

pub fn parse_csv_bytes(bytes: &[u8], headerless: bool) -> Result<DataTable> {
    let bytes = strip_bom(bytes);
    // Exports occasionally carry stray non-UTF8 bytes
    let content = String::from_utf8_lossy(bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(sniff_delimiter(bytes))
        .from_reader(content.as_bytes());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    if headerless {
        return Ok(DataTable::headerless(rows));
    }

    if rows.is_empty() {
        return Ok(DataTable::new(Vec::new(), Vec::new()));
    }

    let headers = rows.remove(0);
    Ok(DataTable::new(headers, rows))
}

/// Serialize a table back to CSV bytes. Cleaned artifacts are always
/// written as CSV, regardless of the source format.
pub fn write_csv_bytes(table: &DataTable) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());

    if !table.is_headerless() {
        writer.write_record(&table.headers)?;
    }
    for row in &table.rows {
        writer.write_record(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| MerchsumError::Parse(format!("Could not finish CSV output: {e}")))
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// Guess the delimiter from the head of the file. Some point-of-sale
/// systems export semicolon or tab separated files under a .csv name.
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let sample = &bytes[..bytes.len().min(4096)];

    let commas = memchr::memchr_iter(b',', sample).count();
    let semicolons = memchr::memchr_iter(b';', sample).count();
    let tabs = memchr::memchr_iter(b'\t', sample).count();

    if semicolons > commas && semicolons > tabs {
        b';'
    } else if tabs > commas && tabs > semicolons {
        b'\t'
    } else {
        b','
    }
}
