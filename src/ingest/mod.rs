//! Table ingestion
//!
//! This module reads data exports into tables. CSV and spreadsheet
//! sources end up in the same in-memory shape so the cleaning and
//! analytics stages never care where a table came from.

pub mod csv;
pub mod sheet;

use rayon::prelude::*;

use crate::core::error::Result;
use crate::core::types::{DataTable, DatasetKind, SourceFile};

use std::path::Path;

const SHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Read one source into a table, dispatching on the file extension.
pub fn read_table(source: &SourceFile) -> Result<DataTable> {
    // Sales exports start with a report preamble, not column names
    let headerless = source.kind == DatasetKind::Sales;

    if is_sheet_path(&source.path) {
        sheet::read_sheet_table(&source.path, headerless)
    } else {
        self::csv::read_csv_table(&source.path, headerless)
    }
}

/// Read a batch of sources in parallel. Failures are returned per file
/// so one unreadable export does not abort the run.
pub fn read_tables(sources: &[SourceFile]) -> Vec<(SourceFile, Result<DataTable>)> {
    sources
        .par_iter()
        .map(|source| (source.clone(), read_table(source)))
        .collect()
}

fn is_sheet_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| SHEET_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
